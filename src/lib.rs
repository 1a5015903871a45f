//! `fpt-kinetics` library crate.
//!
//! Unbiased kinetic rates from rescaled first-passage times of enhanced
//! sampling simulations, by two independent methods:
//!
//! - a windowed scan over candidate cutoffs T* that keeps the window whose
//!   log-survival curve is most linear (`scan`)
//! - a direct least-squares fit of the exponential CDF, optionally checked with
//!   a two-sample KS test (`fit`)
//!
//! [`KineticsEstimator`] wraps both behind one configuration. The binary
//! (`fpt`) is a thin wrapper around this library.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod scan;

pub use domain::{
    CurveFitConfig, EstimationRow, EstimationTable, EstimatorConfig, ExponentialFit, FitOutcome,
    GoodnessOfFit,
};
pub use error::KineticsError;
pub use estimator::KineticsEstimator;
