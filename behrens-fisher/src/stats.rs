use std::iter::FromIterator;

/// Accumulates sample statistics one observation at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsBuilder {
    count: usize,
    mean: f64,
    /// Sum of squared distances from the current mean
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for StatsBuilder {
    fn default() -> StatsBuilder {
        StatsBuilder {
            count: 0,
            mean: 0.,
            m2: 0.,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl StatsBuilder {
    pub fn update(&mut self, x: f64) {
        // Welford's online algorithm
        self.count += 1;
        let delta1 = x - self.mean;
        self.mean += delta1 / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta1 * delta2;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    pub fn count(self) -> usize {
        self.count
    }

    pub fn mean(self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    pub fn sample_var(self) -> f64 {
        if self.count <= 1 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// The smallest observation, or NaN if there are none
    pub fn min(self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.min
        }
    }

    /// The largest observation, or NaN if there are none
    pub fn max(self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.max
        }
    }
}

impl Extend<f64> for StatsBuilder {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for x in iter {
            self.update(x);
        }
    }
}

impl FromIterator<f64> for StatsBuilder {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> StatsBuilder {
        let mut bldr = StatsBuilder::default();
        bldr.extend(iter);
        bldr
    }
}

/// Sample statistics.
///
/// Assumed to be taken from a normally-distributed population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    /// The sample size
    pub count: usize,
    /// The sample mean
    pub mean: f64,
    /// The sample variance
    pub var: f64,
}

impl From<StatsBuilder> for SampleStats {
    fn from(x: StatsBuilder) -> SampleStats {
        SampleStats {
            count: x.count(),
            mean: x.mean(),
            var: x.sample_var(),
        }
    }
}

impl FromIterator<f64> for SampleStats {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> SampleStats {
        iter.into_iter().collect::<StatsBuilder>().into()
    }
}

impl<'a> FromIterator<&'a f64> for SampleStats {
    fn from_iter<T: IntoIterator<Item = &'a f64>>(iter: T) -> SampleStats {
        iter.into_iter().copied().collect()
    }
}

impl SampleStats {
    /// An estimate of the variance of `mean` (which is an estimate of the
    /// population mean).
    ///
    /// When estimating μ with a sample mean ̄x, the variance of this
    /// estimate is σ²/n, where n is the size of the sample.  Since we also
    /// don't know σ², we have to estimate the variance of the estimated
    /// mean by s²/n.
    pub fn mean_var(self) -> f64 {
        self.var / self.count as f64
    }

    pub fn std_dev(self) -> f64 {
        self.var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welford() {
        let stats = vec![1.0_f64, 2., 3.].into_iter().collect::<SampleStats>();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 2.);
        assert_eq!(stats.var, 1.);

        let stats = [0.0_f64, -2., 2.].iter().collect::<SampleStats>();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 0.);
        assert_eq!(stats.var, 4.);
        assert_eq!(stats.std_dev(), 2.);

        let stats = (0..=100).map(f64::from).collect::<SampleStats>();
        assert_eq!(stats.count, 101);
        assert_eq!(stats.mean, 50.);
        assert_eq!(stats.var, 858.5);
    }

    #[test]
    fn degenerate() {
        let empty = std::iter::empty::<f64>().collect::<StatsBuilder>();
        assert_eq!(empty.count(), 0);
        assert!(empty.mean().is_nan());
        assert!(empty.min().is_nan());
        assert!(empty.max().is_nan());

        let one = SampleStats::from_iter(vec![7.0_f64]);
        assert_eq!(one.mean, 7.);
        assert!(one.var.is_nan());
    }

    #[test]
    fn extremes() {
        let bldr = vec![3.0_f64, -1., 8., 2.].into_iter().collect::<StatsBuilder>();
        assert_eq!(bldr.min(), -1.);
        assert_eq!(bldr.max(), 8.);
    }
}
