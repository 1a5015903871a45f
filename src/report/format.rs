//! Formatted terminal output.
//!
//! We keep formatting code in one place so the estimators stay free of
//! presentation concerns.

use crate::domain::EstimationTable;
use crate::error::AppError;
use crate::report::{FitReport, ScanReport};

/// Summary of the windowed scan (plus the full table when requested).
pub fn format_scan_summary(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str("=== fpt - windowed-scan kinetics ===\n");
    out.push_str(&format!(
        "Samples: n={} | min sample size={}\n",
        report.n_samples, report.min_sample_size
    ));

    if let Some(table) = &report.table {
        out.push('\n');
        out.push_str(&format_table(table, report.cutoff));
    }

    out.push_str("\nBest window:\n");
    out.push_str(&format!("- cutoff : {}\n", report.cutoff));
    out.push_str(&format!("- R2     : {:.6}\n", report.best.r_squared));
    out.push_str(&format!("- rate   : {:.6e}\n", report.rate));
    out.push_str(&format!("- MFPT   : {:.6e}\n", report.mfpt));
    out.push_str(&format!("- T*     : {:.6e}\n", report.tstar));

    out
}

/// One line per cutoff; the selected cutoff is marked with `*`.
pub fn format_table(table: &EstimationTable, best_cutoff: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:>7} {:>14} {:>14} {:>10}\n",
        "cutoff", "time", "rate", "R2"
    ));
    for (pos, row) in table.rows().iter().enumerate() {
        let cutoff = table.cutoff(pos);
        let mark = if cutoff == best_cutoff { "*" } else { " " };
        out.push_str(&format!(
            "{mark} {cutoff:>7} {:>14.6e} {:>14.6e} {:>10.6}\n",
            row.time, row.prediction, row.r_squared
        ));
    }
    out
}

/// Summary of the direct exponential fit.
pub fn format_fit_summary(report: &FitReport) -> String {
    let mut out = String::new();

    out.push_str("=== fpt - exponential CDF fit ===\n");
    out.push_str(&format!("Samples: n={}\n", report.n_samples));
    out.push_str(&format!(
        "Solver: iterations={} | SSE={:.6e}\n",
        report.iterations, report.sse
    ));
    out.push_str("\nEstimate:\n");
    out.push_str(&format!("- MFPT : {:.6e}\n", report.mfpt));
    out.push_str(&format!("- rate : {:.6e}\n", report.rate));

    if let Some(gof) = &report.goodness_of_fit {
        out.push_str(&format!(
            "\nKS test vs {} synthetic samples: D={:.4}, p={:.4}\n",
            gof.synthetic_sample_count, gof.statistic, gof.p_value
        ));
    }

    out
}

/// Serialize any report as pretty JSON.
pub fn format_json<T: serde::Serialize>(report: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AppError::new(4, format!("Failed to serialize report: {e}")))
}
