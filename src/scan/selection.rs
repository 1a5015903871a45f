//! Best-row selection for the windowed scan.
//!
//! Selection rule:
//! 1. Skip rows whose R² is not finite (degenerate windows)
//! 2. Choose the row with maximum R²
//! 3. On ties, keep the smallest cutoff (first maximal row in table order)

use tracing::debug;

use crate::domain::{EstimationRow, EstimationTable};
use crate::error::KineticsError;

/// Position (within `table.rows()`) of the best row.
pub fn best_position(table: &EstimationTable) -> Result<usize, KineticsError> {
    if table.is_empty() {
        return Err(KineticsError::EmptyTable);
    }

    let mut best: Option<(usize, f64)> = None;
    for (pos, row) in table.rows().iter().enumerate() {
        if !row.r_squared.is_finite() {
            continue;
        }
        // Strict `>` keeps the earliest row on ties.
        match best {
            Some((_, r2)) if row.r_squared <= r2 => {}
            _ => best = Some((pos, row.r_squared)),
        }
    }

    let Some((pos, r2)) = best else {
        return Err(KineticsError::InsufficientData(format!(
            "none of the {} estimation rows has a finite R²",
            table.len()
        )));
    };

    debug!(position = pos, cutoff = table.cutoff(pos), r_squared = r2, "selected best row");
    Ok(pos)
}

/// Row with the maximum R², first occurrence on ties.
pub fn select_best_row(table: &EstimationTable) -> Result<EstimationRow, KineticsError> {
    let pos = best_position(table)?;
    Ok(table.rows()[pos])
}
