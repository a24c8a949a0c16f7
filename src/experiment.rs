use anyhow::{bail, Context, Result};
use behrens_fisher::*;
use log::*;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;
use std::str::FromStr;

/// How many leading observations of `a` and `b` go into one test
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Pairing {
    pub x_len: usize,
    pub y_len: usize,
}

impl Pairing {
    pub const fn new(x_len: usize, y_len: usize) -> Pairing {
        Pairing { x_len, y_len }
    }
}

impl FromStr for Pairing {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Pairing, String> {
        let (x, y) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected N:M, got \"{}\"", s))?;
        let parse = |n: &str| {
            n.trim()
                .parse::<usize>()
                .map_err(|e| format!("\"{}\": {}", n, e))
        };
        Ok(Pairing {
            x_len: parse(x)?,
            y_len: parse(y)?,
        })
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.x_len, self.y_len)
    }
}

/// One draw from each population
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    /// Drawn from N(0, 1)
    pub a: Vec<f64>,
    /// Drawn from N(shift, 1)
    pub b: Vec<f64>,
}

impl Samples {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, size: usize, shift: f64) -> Samples {
        let a = (0..size).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let b = (0..size)
            .map(|_| rng.sample::<f64, _>(StandardNormal) + shift)
            .collect();
        Samples { a, b }
    }
}

/// The test of one pairing within a trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub pairing: Pairing,
    pub x: SampleStats,
    pub y: SampleStats,
    pub test: TTest,
    /// Half-width of the 95% CI for `y.mean - x.mean`
    pub ci95: f64,
}

impl Outcome {
    pub fn delta(&self) -> f64 {
        self.y.mean - self.x.mean
    }
}

pub struct Trial {
    pub samples: Samples,
    pub outcomes: Vec<Outcome>,
}

/// The spread of p-values for one pairing over many trials.
///
/// p-values span hundreds of orders of magnitude, so we summarize log10(p).
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub pairing: Pairing,
    pub log_p: StatsBuilder,
}

impl Summary {
    pub fn trials(&self) -> usize {
        self.log_p.count()
    }
    pub fn log_p(&self) -> SampleStats {
        self.log_p.into()
    }
    pub fn min_p(&self) -> f64 {
        10f64.powf(self.log_p.min())
    }
    pub fn max_p(&self) -> f64 {
        10f64.powf(self.log_p.max())
    }
}

#[derive(Debug, Clone)]
pub struct Experiment {
    /// The number of observations drawn from each population
    pub size: usize,
    /// μ_b - μ_a
    pub shift: f64,
    pub variance: Variance,
    pub pairings: Vec<Pairing>,
}

impl Default for Experiment {
    fn default() -> Experiment {
        Experiment {
            size: 1000,
            shift: 1.0,
            variance: Variance::Pooled,
            pairings: vec![Pairing::new(1000, 1000), Pairing::new(200, 500)],
        }
    }
}

impl Experiment {
    fn check(&self) -> Result<()> {
        if self.pairings.is_empty() {
            bail!("Nothing to test: no pairings given");
        }
        for pairing in &self.pairings {
            if pairing.x_len > self.size || pairing.y_len > self.size {
                bail!(
                    "Pairing {} needs more than the {} observations drawn",
                    pairing,
                    self.size
                );
            }
        }
        Ok(())
    }

    /// Draw both samples once and test every pairing against that draw
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trial> {
        self.check()?;
        let samples = Samples::draw(rng, self.size, self.shift);
        let outcomes = self
            .pairings
            .iter()
            .map(|&pairing| self.evaluate(&samples, pairing))
            .collect::<Result<Vec<_>>>()?;
        Ok(Trial { samples, outcomes })
    }

    fn evaluate(&self, samples: &Samples, pairing: Pairing) -> Result<Outcome> {
        let x: SampleStats = samples.a[..pairing.x_len].iter().collect();
        let y: SampleStats = samples.b[..pairing.y_len].iter().collect();
        let test = t_test(x, y, self.variance)
            .with_context(|| format!("Can't test pairing {}", pairing))?;
        let ci95 = confidence_interval(0.95, x, y, self.variance)
            .with_context(|| format!("Can't compute CI for pairing {}", pairing))?;
        debug!(
            "{}: x={:?} y={:?} t={} dof={} p={:e}",
            pairing, x, y, test.statistic, test.dof, test.p_value
        );
        Ok(Outcome {
            pairing,
            x,
            y,
            test,
            ci95,
        })
    }

    /// Run `trials` independent trials and summarize the p-values of each
    /// pairing
    pub fn repeat<R: Rng + ?Sized>(&self, rng: &mut R, trials: usize) -> Result<Vec<Summary>> {
        let mut log_ps = vec![StatsBuilder::default(); self.pairings.len()];
        for i in 0..trials {
            let trial = self.run(rng)?;
            for (log_p, outcome) in log_ps.iter_mut().zip(&trial.outcomes) {
                let mut p = outcome.test.p_value;
                if p == 0. {
                    warn!(
                        "Trial {}: p-value for {} underflowed; counting it as {:e}",
                        i,
                        outcome.pairing,
                        f64::MIN_POSITIVE
                    );
                    p = f64::MIN_POSITIVE;
                }
                log_p.update(p.log10());
            }
        }
        Ok(self
            .pairings
            .iter()
            .zip(log_ps)
            .map(|(&pairing, log_p)| Summary { pairing, log_p })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_pairing() {
        assert_eq!("200:500".parse::<Pairing>(), Ok(Pairing::new(200, 500)));
        assert_eq!(" 3 : 4".parse::<Pairing>(), Ok(Pairing::new(3, 4)));
        assert!("200".parse::<Pairing>().is_err());
        assert!("a:5".parse::<Pairing>().is_err());
        assert!("-1:5".parse::<Pairing>().is_err());
        assert_eq!(Pairing::new(1000, 1000).to_string(), "1000:1000");
    }

    #[test]
    fn draws_from_the_right_populations() {
        let mut rng = StdRng::seed_from_u64(1);
        let samples = Samples::draw(&mut rng, 1000, 1.0);
        assert_eq!(samples.a.len(), 1000);
        assert_eq!(samples.b.len(), 1000);
        let a: SampleStats = samples.a.iter().collect();
        let b: SampleStats = samples.b.iter().collect();
        assert!(a.mean.abs() < 0.15, "{:?}", a);
        assert!((b.mean - 1.).abs() < 0.15, "{:?}", b);
        assert!((0.8..1.2).contains(&a.var), "{:?}", a);
        assert!((0.8..1.2).contains(&b.var), "{:?}", b);
    }

    #[test]
    fn default_experiment() {
        let mut rng = StdRng::seed_from_u64(2);
        let trial = Experiment::default().run(&mut rng).unwrap();
        let [big, small] = [trial.outcomes[0], trial.outcomes[1]];

        assert_eq!((big.x.count, big.y.count), (1000, 1000));
        assert_eq!((small.x.count, small.y.count), (200, 500));
        // The small pairing tests prefixes of the same draw
        let prefix: SampleStats = trial.samples.a[..200].iter().collect();
        assert_eq!(small.x, prefix);

        assert!(big.test.p_value > 0.);
        assert!(big.test.p_value < 1e-50, "{:?}", big);
        assert!(small.test.p_value < 1e-10, "{:?}", small);
        assert!(big.test.p_value < small.test.p_value);
        assert_eq!(big.test.dof, 1998.);
        assert_eq!(small.test.dof, 698.);
        assert!(big.test.statistic < 0.);
        assert!((big.delta() - 1.).abs() < big.ci95 * 2.);
    }

    #[test]
    fn seeds_are_reproducible() {
        let exp = Experiment::default();
        let p = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            exp.run(&mut rng).unwrap().outcomes[0].test.p_value
        };
        assert_eq!(p(7), p(7));
        assert_ne!(p(7), p(8));
    }

    #[test]
    fn pairing_too_long() {
        let exp = Experiment {
            pairings: vec![Pairing::new(200, 1001)],
            ..Experiment::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert!(exp.run(&mut rng).is_err());

        let exp = Experiment {
            pairings: vec![],
            ..Experiment::default()
        };
        assert!(exp.run(&mut rng).is_err());
    }

    #[test]
    fn tiny_pairing_is_an_error() {
        let exp = Experiment {
            pairings: vec![Pairing::new(1, 10)],
            ..Experiment::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let err = exp.run(&mut rng).err().unwrap();
        assert!(err.downcast_ref::<behrens_fisher::Error>().is_some());
    }

    #[test]
    fn false_positive_rate() {
        // Under the null hypothesis p is uniform, so about 5% of tests
        // should come out below 0.05.
        let exp = Experiment {
            size: 20,
            shift: 0.,
            variance: Variance::Pooled,
            pairings: vec![Pairing::new(20, 20)],
        };
        let mut rng = StdRng::seed_from_u64(5);
        let rejections = (0..400)
            .filter(|_| exp.run(&mut rng).unwrap().outcomes[0].test.p_value < 0.05)
            .count();
        assert!((5..45).contains(&rejections), "{} rejections", rejections);
    }

    #[test]
    fn repeated_trials() {
        let exp = Experiment {
            variance: Variance::Welch,
            ..Experiment::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let summaries = exp.repeat(&mut rng, 20).unwrap();
        assert_eq!(summaries.len(), 2);
        let [big, small] = [summaries[0], summaries[1]];
        assert_eq!(big.pairing, Pairing::new(1000, 1000));
        assert_eq!(big.trials(), 20);
        assert!(big.min_p() <= big.max_p());
        assert!(big.log_p().mean < small.log_p().mean);
        assert!(big.log_p().std_dev() > 0.);
    }
}
