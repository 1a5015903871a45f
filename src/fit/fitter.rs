//! Direct exponential curve fit.
//!
//! Given first-passage times `t_i` (caller order) we pair each with the
//! positional empirical CDF value `i / N` (1-based) and fit
//!
//! ```text
//! F(t; a) = 1 - exp(-t/a)
//! ```
//!
//! by Levenberg–Marquardt, starting from the sample mean. `a` is the MFPT.
//!
//! The pairing is positional: samples are *not* sorted unless
//! `CurveFitConfig::sort_samples` is set. Unsorted input produces a
//! meaningless fit, so we emit a warning when we see it.

use tracing::{debug, warn};

use crate::data::validate_samples;
use crate::domain::{CurveFitConfig, ExponentialFit};
use crate::error::KineticsError;
use crate::math::{LmOptions, levenberg_marquardt};
use crate::models::{fill_jacobian_row, predict};

/// Positional empirical CDF: `1/N, 2/N, ..., 1`.
pub fn positional_cdf(n: usize) -> Vec<f64> {
    let n_f = n as f64;
    (1..=n).map(|i| i as f64 / n_f).collect()
}

/// Fit the exponential CDF to `samples` and return the fitted mean.
pub fn fit_exponential(samples: &[f64], config: &CurveFitConfig) -> Result<ExponentialFit, KineticsError> {
    if samples.is_empty() {
        return Err(KineticsError::InsufficientData(
            "no samples to fit".to_string(),
        ));
    }
    validate_samples(samples)?;
    if samples.iter().all(|&v| v == samples[0]) {
        return Err(KineticsError::InsufficientData(format!(
            "curve fit needs at least 2 distinct values, all {} samples equal {}",
            samples.len(),
            samples[0]
        )));
    }

    let sorted;
    let times: &[f64] = if config.sort_samples {
        let mut copy = samples.to_vec();
        copy.sort_by(f64::total_cmp);
        sorted = copy;
        &sorted
    } else {
        if samples.windows(2).any(|w| w[1] < w[0]) {
            warn!(
                n = samples.len(),
                "samples are not ascending; the empirical CDF is assigned by position"
            );
        }
        samples
    };

    let cdf = positional_cdf(times.len());
    let mean = times.iter().sum::<f64>() / times.len() as f64;

    let opts = LmOptions {
        max_iterations: config.max_iterations,
        ftol: config.ftol,
        xtol: config.xtol,
    };
    let solution = levenberg_marquardt(times, &cdf, &[mean], predict, fill_jacobian_row, &opts)?;

    let a = solution.params[0];
    if !(a.is_finite() && a > 0.0) {
        return Err(KineticsError::FitDidNotConverge {
            iterations: solution.iterations,
            reason: format!("fitted mean is not a positive finite number: {a}"),
        });
    }

    debug!(
        n = times.len(),
        initial_guess = mean,
        mfpt = a,
        sse = solution.sse,
        iterations = solution.iterations,
        "exponential fit converged"
    );

    Ok(ExponentialFit {
        mean: a,
        sse: solution.sse,
        iterations: solution.iterations,
    })
}
