use thiserror::Error;

/// Failures raised by the estimators.
///
/// Numeric degeneracy inside an estimation table (a zero denominator in the
/// closed-form rate or in R²) is not an error: it shows up as NaN / ±inf in
/// the affected rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KineticsError {
    /// Not enough usable samples for the requested operation.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Best-row selection on a table with no rows.
    #[error("estimation table is empty")]
    EmptyTable,

    /// The nonlinear solver ran out of budget or stalled.
    #[error("curve fit did not converge after {iterations} iterations: {reason}")]
    FitDidNotConverge { iterations: usize, reason: String },

    /// A sample is negative or not finite.
    #[error("invalid sample at index {index}: {value}")]
    InvalidSample { index: usize, value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error surfaced by the `fpt` binary, carrying the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<KineticsError> for AppError {
    fn from(err: KineticsError) -> Self {
        let exit_code = match err {
            KineticsError::InvalidSample { .. } | KineticsError::InvalidConfig(_) => 2,
            KineticsError::InsufficientData(_) | KineticsError::EmptyTable => 3,
            KineticsError::FitDidNotConverge { .. } => 4,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
