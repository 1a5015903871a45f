//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built and discarded inside a single estimation call
//! - printed as JSON by the `fpt` binary
//! - loaded from a config file by embedding applications

use serde::{Deserialize, Serialize};

/// Default minimum number of samples in the smallest fitted window.
pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 5;

/// Default size of the synthetic exponential population used by the KS test.
pub const DEFAULT_SYNTHETIC_SAMPLE_COUNT: usize = 1_000_000;

/// MINPACK's default relative tolerance (`sqrt(f64::EPSILON)`, rounded).
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

/// One candidate cutoff of the windowed scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationRow {
    /// Sample time at the cutoff index (one past the fitted window); the candidate T*.
    pub time: f64,
    /// Closed-form rate fitted over the window.
    pub prediction: f64,
    /// Coefficient of determination of `ln S(t) = -k t` over the window.
    pub r_squared: f64,
}

/// All rows of a windowed scan, in ascending cutoff order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationTable {
    /// Cutoff index of the first row.
    pub min_sample_size: usize,
    rows: Vec<EstimationRow>,
}

impl EstimationTable {
    pub fn new(min_sample_size: usize, rows: Vec<EstimationRow>) -> Self {
        Self {
            min_sample_size,
            rows,
        }
    }

    pub fn rows(&self) -> &[EstimationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cutoff index (`limit`) that produced the row at `position`.
    pub fn cutoff(&self, position: usize) -> usize {
        self.min_sample_size + position
    }
}

/// Result of the direct exponential curve fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFit {
    /// Fitted mean first-passage time `a` in `F(t) = 1 - exp(-t/a)`.
    pub mean: f64,
    /// Residual sum of squares at the solution.
    pub sse: f64,
    pub iterations: usize,
}

/// Two-sample Kolmogorov–Smirnov outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFit {
    /// Maximum absolute ECDF difference `D`.
    pub statistic: f64,
    pub p_value: f64,
    pub synthetic_sample_count: usize,
}

/// Value returned by `fit_mfpt` / `fit_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    /// Either the MFPT (`a`) or the rate (`1/a`), depending on the operation.
    pub value: f64,
    pub fit: ExponentialFit,
    pub goodness_of_fit: Option<GoodnessOfFit>,
}

impl FitOutcome {
    pub fn p_value(&self) -> Option<f64> {
        self.goodness_of_fit.map(|g| g.p_value)
    }
}

/// Settings of the direct curve-fit estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveFitConfig {
    /// Solver iteration budget.
    pub max_iterations: usize,
    /// Relative reduction in the sum of squares below which the fit has converged.
    pub ftol: f64,
    /// Relative change in `a` below which the fit has converged.
    pub xtol: f64,
    /// Size of the synthetic exponential population for the KS test.
    pub synthetic_sample_count: usize,
    /// Seed for the synthetic population. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Sort samples before pairing them with the positional empirical CDF.
    ///
    /// Off by default: samples are paired with `i/N` in caller order, so
    /// unsorted input yields a meaningless fit.
    pub sort_samples: bool,
}

impl Default for CurveFitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            ftol: DEFAULT_TOLERANCE,
            xtol: DEFAULT_TOLERANCE,
            synthetic_sample_count: DEFAULT_SYNTHETIC_SAMPLE_COUNT,
            seed: None,
            sort_samples: false,
        }
    }
}

/// Estimator-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Smallest window used for the windowed scan; the first cutoff.
    pub min_sample_size: usize,
    pub curve_fit: CurveFitConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
            curve_fit: CurveFitConfig::default(),
        }
    }
}
