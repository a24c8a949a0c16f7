/*! A crate for testing whether the means of two distributions are the same.

## Example

Suppose we have a population distributed as `X` (normal), and another
distributed as `Y` (also normal, but possibly with different mean/variance to
`X`).  Let's take a sample from each population and ask whether the
population means differ.

```
# use behrens_fisher::*;
let x_sample: Vec<f64> = vec![1., 2., 3., 4.];
let y_sample: Vec<f64> = vec![3., 5., 7., 9., 11.];

let x_stats = x_sample.into_iter().collect::<SampleStats>();
let y_stats = y_sample.into_iter().collect::<SampleStats>();
let test = t_test(x_stats, y_stats, Variance::Welch).unwrap();
let width = confidence_interval(0.95, x_stats, y_stats, Variance::Welch).unwrap();
let msg = format!(
    "Δ = {:+.2} ± {:.2} (p=95%), t = {:.3}, p-value = {:.4}",
    y_stats.mean - x_stats.mean,
    width,
    test.statistic,
    test.p_value,
);
assert_eq!(msg, "Δ = +4.50 ± 3.89 (p=95%), t = -2.895, p-value = 0.0303");
// Looks like μ[Y] > μ[X]!
```

*/

mod stats;
pub mod student_t;

pub use stats::*;

/// How the variances of the two populations are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variance {
    /// Assume both populations share a variance (Student's t-test)
    #[default]
    Pooled,
    /// Allow the variances to differ (Welch's t-test)
    Welch,
}

/// The result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    /// The t statistic, `(x.mean - y.mean) / se`
    pub statistic: f64,
    /// Degrees of freedom of the reference t-distribution
    pub dof: f64,
    /// Two-sided p-value for the null hypothesis μ_x = μ_y
    pub p_value: f64,
}

/// The standard error of `y.mean - x.mean` and its degrees of freedom.
///
/// ## Pooled
///
/// If X and Y share a variance σ², both samples estimate it, and we
/// combine them as s²_p = ((n_x-1)s²_x + (n_y-1)s²_y) / (n_x+n_y-2).  The
/// variance of ̄y - ̄x is then s²_p (1/n_x + 1/n_y), with n_x+n_y-2
/// degrees of freedom.
///
/// ## Welch
///
/// Otherwise we use the sum of the variances of ̄x and ̄y, which gives
/// s²_x/n_x + s²_y/n_y.  The degrees of freedom for s² is n-1.  To compute
/// the pooled degrees of freedom of the linear combination
/// s²_x/n_x + s²_y/n_y, we use the Welch–Satterthwaite equation.
fn std_error(x: SampleStats, y: SampleStats, variance: Variance) -> Result<(f64, f64), Error> {
    // Prevent division by zero (see "degrees of freedom")
    if x.count < 2 || y.count < 2 {
        return Err(Error::NotEnoughData);
    }
    if !x.var.is_finite() || !y.var.is_finite() {
        return Err(Error::InfiniteVariance);
    }
    match variance {
        Variance::Pooled => {
            if x.var == 0. && y.var == 0. {
                return Err(Error::ZeroVariance);
            }
            let dof = (x.count + y.count - 2) as f64;
            let pooled_var =
                ((x.count - 1) as f64 * x.var + (y.count - 1) as f64 * y.var) / dof;
            let var_delta = pooled_var * (1. / x.count as f64 + 1. / y.count as f64);
            Ok((var_delta.sqrt(), dof))
        }
        Variance::Welch => {
            if x.var == 0. || y.var == 0. {
                return Err(Error::ZeroVariance);
            }
            let x_mean_var = x.mean_var();
            let y_mean_var = y.mean_var();
            let var_delta = x_mean_var + y_mean_var;

            let k_x = x_mean_var * x_mean_var / (x.count - 1) as f64;
            let k_y = y_mean_var * y_mean_var / (y.count - 1) as f64;
            let dof = var_delta * (var_delta / (k_x + k_y));
            Ok((var_delta.sqrt(), dof))
        }
    }
}

/// Test the null hypothesis that X and Y have the same population mean.
///
/// The returned p-value is two-sided: it's the probability, if the means
/// were equal, of seeing a t statistic at least as far from zero as the
/// one we got.
pub fn t_test(x: SampleStats, y: SampleStats, variance: Variance) -> Result<TTest, Error> {
    let (se, dof) = std_error(x, y, variance)?;
    let statistic = (x.mean - y.mean) / se;
    // Doubling the upper tail of |t| avoids computing `1 - cdf`, which
    // would round tiny p-values to zero.
    let p_value = (2. * student_t::sf(statistic.abs(), dof)).min(1.);
    Ok(TTest {
        statistic,
        dof,
        p_value,
    })
}

/// A confidence interval for `y.mean - x.mean`.  This function returns the
/// half-width of the confidence interval, ie. the `i` in `y.mean - x.mean
/// ± i`.
///
/// Given two normally distributed populations X ~ N(μ_x, σ²_x) and Y ~
/// N(μ_y, σ²_y), Y-X is distributed as N(μ_y - μ_x, σ²_x + σ²_y).  The
/// interval is centred on ̄y - ̄x and its width comes from the critical
/// value of the t-distribution at the chosen confidence level.
pub fn confidence_interval(
    sig_level: f64,
    x: SampleStats,
    y: SampleStats,
    variance: Variance,
) -> Result<f64, Error> {
    let (se, dof) = std_error(x, y, variance)?;

    // Convert `sig_level`, which is two-sided, into `p`, which is one-sided
    let alpha = 1. - sig_level;
    let p = 1. - (alpha / 2.);

    // Compute the critical value at the chosen confidence level
    assert!(p.is_normal());
    assert!(dof.is_normal());
    let t = student_t::inv_cdf(p, dof);

    Ok(t * se)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    NotEnoughData,
    InfiniteVariance,
    ZeroVariance,
}

use std::fmt;
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotEnoughData => f.write_str("Can't test a sample smaller than 2"),
            Error::InfiniteVariance => {
                f.write_str("The variance of one of the samples is infinite")
            }
            Error::ZeroVariance => f.write_str("The variance of the samples is zero"),
        }
    }
}
impl std::error::Error for Error {}
