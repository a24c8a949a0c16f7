mod dump;
mod experiment;
mod report;

use anyhow::{bail, Result};
use behrens_fisher::Variance;
use bpaf::Bpaf;
use experiment::{Experiment, Pairing};
use log::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Draw a sample from N(0,1) and another from N(shift,1), then t-test
/// leading slices of them against each other to see how the p-value
/// depends on sample size
#[derive(Bpaf, Debug, Clone)]
#[bpaf(options, version)]
struct Options {
    /// Seed for the random number generator (random if not given)
    #[bpaf(long, env("PVAL_SEED"), argument("SEED"))]
    seed: Option<u64>,
    /// Observations to draw from each population
    #[bpaf(long, argument("N"), fallback(1000), display_fallback)]
    size: usize,
    /// Difference between the population means
    #[bpaf(long, argument("D"), fallback(1.0), display_fallback)]
    shift: f64,
    /// Test the first N observations of one sample against the first M of
    /// the other.  Defaults to 1000:1000 and 200:500
    #[bpaf(long("pair"), argument("N:M"))]
    pairs: Vec<Pairing>,
    /// Use Welch's t-test instead of assuming equal variances
    welch: bool,
    /// Repeat the experiment this many times and summarize the p-values
    #[bpaf(long, argument("N"), fallback(1), display_fallback)]
    trials: usize,
    /// Print one JSON object per line instead of a table
    json: bool,
    /// Don't highlight significant p-values
    no_color: bool,
    /// Also write the drawn samples to this CSV file
    #[bpaf(long, argument("PATH"))]
    dump: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let opts = options().run();
    match run(opts) {
        Ok(()) => (),
        Err(e) => {
            // Ignore EPIPE
            if let Some(e) = e.downcast_ref::<std::io::Error>() {
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    return;
                }
            }
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn run(opts: Options) -> Result<()> {
    if opts.trials == 0 {
        bail!("--trials must be at least 1");
    }
    let seed = opts.seed.unwrap_or_else(rand::random);
    info!("Seed: {} (set PVAL_SEED to reproduce this run)", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let defaults = Experiment::default();
    let experiment = Experiment {
        size: opts.size,
        shift: opts.shift,
        variance: if opts.welch {
            Variance::Welch
        } else {
            Variance::Pooled
        },
        pairings: if opts.pairs.is_empty() {
            defaults.pairings
        } else {
            opts.pairs
        },
    };
    info!("{:?}", experiment);

    let stdout = std::io::stdout();
    let style = report::Style {
        json: opts.json,
        color: !opts.no_color && stdout.is_terminal(),
    };
    let stdout = stdout.lock();

    if opts.trials > 1 {
        if opts.dump.is_some() {
            warn!("--dump only applies to a single trial; not writing samples");
        }
        let summaries = experiment.repeat(&mut rng, opts.trials)?;
        report::print_summaries(stdout, &summaries, style)
    } else {
        let trial = experiment.run(&mut rng)?;
        if let Some(path) = &opts.dump {
            dump::dump(path, &trial.samples)?;
            info!("Wrote samples to {}", path.display());
        }
        report::print_outcomes(stdout, &trial.outcomes, style)
    }
}
