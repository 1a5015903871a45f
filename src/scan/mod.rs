//! Windowed-scan estimation.
//!
//! Responsibilities:
//!
//! - build the estimation table over every candidate cutoff (parallel)
//! - select the row whose window best linearizes the log-survival curve

pub mod selection;
pub mod table;

pub use selection::*;
pub use table::*;
