//! Reporting: summaries of a windowed scan or a direct fit, as text or JSON.

pub mod format;

use serde::Serialize;

use crate::domain::{EstimationRow, EstimationTable, FitOutcome, GoodnessOfFit};

pub use format::*;

/// Outcome of `fpt scan`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub n_samples: usize,
    pub min_sample_size: usize,
    /// Cutoff index of the selected window.
    pub cutoff: usize,
    pub best: EstimationRow,
    pub rate: f64,
    pub mfpt: f64,
    pub tstar: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<EstimationTable>,
}

impl ScanReport {
    pub fn new(
        n_samples: usize,
        table: EstimationTable,
        best_position: usize,
        include_table: bool,
    ) -> Self {
        let best = table.rows()[best_position];
        Self {
            n_samples,
            min_sample_size: table.min_sample_size,
            cutoff: table.cutoff(best_position),
            best,
            rate: best.prediction,
            mfpt: 1.0 / best.prediction,
            tstar: best.time,
            table: include_table.then_some(table),
        }
    }
}

/// Outcome of `fpt fit`.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub n_samples: usize,
    pub mfpt: f64,
    pub rate: f64,
    pub sse: f64,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodness_of_fit: Option<GoodnessOfFit>,
}

impl FitReport {
    /// Build from an `fit_mfpt` outcome.
    pub fn from_mfpt(n_samples: usize, outcome: &FitOutcome) -> Self {
        Self {
            n_samples,
            mfpt: outcome.value,
            rate: 1.0 / outcome.value,
            sse: outcome.fit.sse,
            iterations: outcome.fit.iterations,
            goodness_of_fit: outcome.goodness_of_fit,
        }
    }
}
