//! Command-line parsing for the first-passage kinetics estimators.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_MIN_SAMPLE_SIZE, DEFAULT_SYNTHETIC_SAMPLE_COUNT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fpt",
    version,
    about = "Unbiased kinetics from rescaled first-passage times"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Windowed scan: rate, MFPT and T* from the best log-survival window.
    Scan(ScanArgs),
    /// Direct fit of the exponential CDF, with an optional KS test.
    Fit(FitArgs),
    /// Print synthetic exponential first-passage times, one per line.
    Simulate(SimulateArgs),
}

/// Where samples come from and how results are printed.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// File with whitespace/comma separated times (`-` or omitted: stdin).
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Options for `fpt scan`.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Smallest window (number of samples) fitted; the first cutoff.
    #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_SAMPLE_SIZE)]
    pub min_sample_size: usize,

    /// Include every cutoff in the output.
    #[arg(long)]
    pub table: bool,
}

/// Options for `fpt fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Run the two-sample KS test against a synthetic exponential population.
    #[arg(long)]
    pub ks: bool,

    /// Size of the synthetic population for the KS test.
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_SAMPLE_COUNT)]
    pub synthetic_samples: usize,

    /// Seed for the synthetic population (default: OS entropy).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sort samples before assigning the empirical CDF.
    #[arg(long)]
    pub sort: bool,

    /// Solver iteration budget.
    #[arg(long, default_value_t = 400)]
    pub max_iterations: usize,
}

/// Options for `fpt simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Mean first-passage time of the exponential distribution.
    #[arg(long, default_value_t = 10.0)]
    pub mean: f64,

    /// Number of samples to draw.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed (default: OS entropy).
    #[arg(long)]
    pub seed: Option<u64>,
}
