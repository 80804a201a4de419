//! Error types for solver operations.

use nm_core::error::NmError;
use thiserror::Error;

/// Errors that can occur during numerical solves.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("No sign change in bracket for {what}")]
    NoBracket { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for NmError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ConvergenceFailed { what: _ } => NmError::InvalidArg {
                what: "convergence",
            },
            SolverError::NoBracket { what } => NmError::InvalidArg { what },
            SolverError::InvalidArg { what } => NmError::InvalidArg { what },
            SolverError::Numeric { what: _ } => NmError::InvalidArg { what: "numeric" },
        }
    }
}
