//! Estimation table construction for the windowed scan.
//!
//! Given ascending first-passage times `t_i` and survival `S_i = (N - i) / N`,
//! each cutoff `limit` in `[min_sample_size, N)` fits the log-survival model
//!
//! ```text
//! ln S(t) = -k t
//! ```
//!
//! through the origin on the first `limit` samples:
//!
//! - `k  = -Σ t_i ln S_i / Σ t_i²`
//! - `R² = 1 - Σ (ln S_i + k t_i)² / Σ (ln S_i - mean(ln S))²`
//!
//! and reports the time of the sample *at* `limit` as the candidate T*.
//!
//! The slope numerator and denominator come from prefix sums accumulated once,
//! sequentially. The two R² sums depend on the window's own `k` and mean, so
//! each cutoff re-sums its window. Cutoffs are independent and evaluated in
//! parallel; `collect` keeps them in cutoff order.

use rayon::prelude::*;
use tracing::debug;

use crate::data::validate_samples;
use crate::domain::{EstimationRow, EstimationTable};
use crate::error::KineticsError;

/// Empirical survival `(N - i) / N` for each ascending index `i`.
pub fn survival(n: usize) -> Vec<f64> {
    let n_f = n as f64;
    (0..n).map(|i| (n - i) as f64 / n_f).collect()
}

/// Natural log of [`survival`]. Always `<= 0`, with `0` at index 0.
pub fn log_survival(n: usize) -> Vec<f64> {
    survival(n).into_iter().map(f64::ln).collect()
}

/// Running sums over the first `i` samples, indexed `0..=N`.
struct PrefixSums {
    t_log_s: Vec<f64>,
    t_sq: Vec<f64>,
    log_s: Vec<f64>,
}

impl PrefixSums {
    fn accumulate(times: &[f64], log_s: &[f64]) -> Self {
        let n = times.len();
        let mut out = Self {
            t_log_s: Vec::with_capacity(n + 1),
            t_sq: Vec::with_capacity(n + 1),
            log_s: Vec::with_capacity(n + 1),
        };
        let (mut tl, mut tt, mut l) = (0.0, 0.0, 0.0);
        out.t_log_s.push(tl);
        out.t_sq.push(tt);
        out.log_s.push(l);
        for (&t, &ls) in times.iter().zip(log_s) {
            tl += t * ls;
            tt += t * t;
            l += ls;
            out.t_log_s.push(tl);
            out.t_sq.push(tt);
            out.log_s.push(l);
        }
        out
    }
}

/// Build the estimation table for every cutoff in `[min_sample_size, N)`.
///
/// **Sorts `samples` ascending in place.** Callers that need their original
/// order must pass a copy.
///
/// Returns an empty table when `min_sample_size >= samples.len()`. Degenerate
/// windows (all-zero times, constant log-survival) are kept as rows with
/// NaN / infinite values.
pub fn build_estimation_table(
    samples: &mut [f64],
    min_sample_size: usize,
) -> Result<EstimationTable, KineticsError> {
    if min_sample_size == 0 {
        return Err(KineticsError::InvalidConfig(
            "min_sample_size must be >= 1".to_string(),
        ));
    }
    validate_samples(samples)?;

    samples.sort_by(f64::total_cmp);
    let times: &[f64] = samples;
    let n = times.len();

    if min_sample_size >= n {
        debug!(n, min_sample_size, "no cutoffs to scan");
        return Ok(EstimationTable::new(min_sample_size, Vec::new()));
    }

    let log_s = log_survival(n);
    let sums = PrefixSums::accumulate(times, &log_s);

    let rows: Vec<EstimationRow> = (min_sample_size..n)
        .into_par_iter()
        .map(|limit| evaluate_window(times, &log_s, &sums, limit))
        .collect();

    debug!(n, min_sample_size, rows = rows.len(), "built estimation table");
    Ok(EstimationTable::new(min_sample_size, rows))
}

fn evaluate_window(times: &[f64], log_s: &[f64], sums: &PrefixSums, limit: usize) -> EstimationRow {
    let k = -sums.t_log_s[limit] / sums.t_sq[limit];
    let mean_log_s = sums.log_s[limit] / limit as f64;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&t, &ls) in times[..limit].iter().zip(&log_s[..limit]) {
        let r = ls + k * t;
        let d = ls - mean_log_s;
        sse += r * r;
        sst += d * d;
    }

    EstimationRow {
        time: times[limit],
        prediction: k,
        r_squared: 1.0 - sse / sst,
    }
}
