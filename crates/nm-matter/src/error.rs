//! Matter sub-model errors.

use nm_core::NmError;
use nm_solver::SolverError;
use thiserror::Error;

/// Result type for sub-model evaluations.
pub type MatterResult<T> = Result<T, MatterError>;

/// Errors that can occur while evaluating a matter sub-model.
#[derive(Error, Debug)]
pub enum MatterError {
    /// Non-physical values (negative density, temperature, mass).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A nonlinear solve inside a sub-model failed to converge.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },

    /// Underlying numerical service error.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

impl From<MatterError> for NmError {
    fn from(err: MatterError) -> Self {
        match err {
            MatterError::NonPhysical { what } => NmError::Invariant { what },
            MatterError::InvalidArg { what } => NmError::InvalidArg { what },
            MatterError::ConvergenceFailed { what } => NmError::InvalidArg { what },
            MatterError::Solver(e) => e.into(),
        }
    }
}
