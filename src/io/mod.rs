//! Input helpers for the `fpt` binary.
//!
//! - plain-text sample lists from a file or stdin (`samples`)

pub mod samples;

pub use samples::*;
