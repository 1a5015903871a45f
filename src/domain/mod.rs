//! Domain types used throughout the estimators.
//!
//! This module defines:
//!
//! - estimator configuration (`EstimatorConfig`, `CurveFitConfig`)
//! - windowed-scan outputs (`EstimationRow`, `EstimationTable`)
//! - curve-fit outputs (`ExponentialFit`, `GoodnessOfFit`, `FitOutcome`)

pub mod types;

pub use types::*;
