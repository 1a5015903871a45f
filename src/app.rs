//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses CLI arguments
//! - reads samples
//! - runs the requested estimator
//! - prints the report

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, ScanArgs, SimulateArgs};
use crate::data::generate_exponential_samples;
use crate::domain::{CurveFitConfig, EstimatorConfig};
use crate::error::AppError;
use crate::estimator::KineticsEstimator;
use crate::io::read_samples;
use crate::report::{FitReport, ScanReport, format_fit_summary, format_json, format_scan_summary};

/// Environment variable holding the log filter (e.g. `FPT_LOG=fpt_kinetics=debug`).
pub const LOG_ENV: &str = "FPT_LOG";

/// Entry point for the `fpt` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Scan(args) => handle_scan(&args),
        Command::Fit(args) => handle_fit(&args),
        Command::Simulate(args) => handle_simulate(&args),
    }
}

/// Log to stderr so stdout stays clean for reports and JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn handle_scan(args: &ScanArgs) -> Result<(), AppError> {
    let mut samples = read_samples(args.input.input.as_deref())?;
    let n = samples.len();
    info!(n, min_sample_size = args.min_sample_size, "running windowed scan");

    let estimator = KineticsEstimator::new(estimator_config_from_scan_args(args));
    let (table, pos) = estimator.scan(&mut samples, None)?;

    let report = ScanReport::new(n, table, pos, args.table);
    if args.input.json {
        println!("{}", format_json(&report)?);
    } else {
        print!("{}", format_scan_summary(&report));
    }
    Ok(())
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let samples = read_samples(args.input.input.as_deref())?;
    info!(n = samples.len(), ks = args.ks, "running exponential fit");

    let estimator = KineticsEstimator::new(estimator_config_from_fit_args(args));
    let outcome = estimator.fit_mfpt(&samples, args.ks, Some(args.synthetic_samples))?;

    let report = FitReport::from_mfpt(samples.len(), &outcome);
    if args.input.json {
        println!("{}", format_json(&report)?);
    } else {
        print!("{}", format_fit_summary(&report));
    }
    Ok(())
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let samples = generate_exponential_samples(args.mean, args.count, args.seed)?;
    let mut out = String::with_capacity(samples.len() * 20);
    for t in samples {
        out.push_str(&format!("{t}\n"));
    }
    print!("{out}");
    Ok(())
}

pub fn estimator_config_from_scan_args(args: &ScanArgs) -> EstimatorConfig {
    EstimatorConfig {
        min_sample_size: args.min_sample_size,
        ..EstimatorConfig::default()
    }
}

pub fn estimator_config_from_fit_args(args: &FitArgs) -> EstimatorConfig {
    EstimatorConfig {
        curve_fit: CurveFitConfig {
            max_iterations: args.max_iterations,
            synthetic_sample_count: args.synthetic_samples,
            seed: args.seed,
            sort_samples: args.sort,
            ..CurveFitConfig::default()
        },
        ..EstimatorConfig::default()
    }
}
