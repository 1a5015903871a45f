//! Direct curve-fit estimation.
//!
//! Responsibilities:
//!
//! - fit the exponential CDF to the positional empirical CDF
//! - optionally check the fit with a two-sample KS test against a synthetic population

pub mod fitter;
pub mod goodness;

pub use fitter::*;
pub use goodness::*;
