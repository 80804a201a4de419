//! Error types for the EOS synthesis engine.

use nm_core::NmError;
use nm_matter::MatterError;
use nm_solver::SolverError;
use thiserror::Error;

pub type EosResult<T> = Result<T, EosError>;

/// Errors from the blended EOS itself (not model rejection; see
/// `select::RejectionReason` for that).
#[derive(Error, Debug)]
pub enum EosError {
    /// Invalid query point (non-positive density or temperature, ...).
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Reference-table row index out of range.
    #[error("Row index out of bounds: {what} (index={index}, len={len})")]
    RowIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A thermodynamic output came out non-finite during committed bulk
    /// evaluation. Fatal: downstream tables cannot tolerate holes.
    #[error("Non-finite {what} at nb={nb} Ye={ye} T={t_mev} MeV")]
    NonFinite {
        what: &'static str,
        nb: f64,
        ye: f64,
        t_mev: f64,
    },

    /// A negative squared sound speed where the model guarantees one.
    #[error("Negative sound speed cs²={cs2} at nb={nb} Ye={ye} T={t_mev} MeV")]
    NegativeSoundSpeed {
        nb: f64,
        ye: f64,
        t_mev: f64,
        cs2: f64,
    },

    /// Sub-model evaluation failure.
    #[error("Matter model error: {0}")]
    Matter(#[from] MatterError),

    /// Numerical service failure.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

impl From<EosError> for NmError {
    fn from(e: EosError) -> Self {
        match e {
            EosError::InvalidArg { what } => NmError::InvalidArg { what },
            EosError::RowIndex { what, index, len } => NmError::IndexOob { what, index, len },
            EosError::NonFinite { what, .. } => NmError::NonFinite {
                what,
                value: f64::NAN,
            },
            EosError::NegativeSoundSpeed { cs2, .. } => NmError::NonFinite {
                what: "squared sound speed",
                value: cs2,
            },
            EosError::Matter(e) => e.into(),
            EosError::Solver(e) => e.into(),
        }
    }
}
