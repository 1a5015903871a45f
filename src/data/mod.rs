//! Sample handling: validation and synthetic exponential populations.

pub mod sample;

pub use sample::*;
