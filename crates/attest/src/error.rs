use thiserror::Error;

use crate::backend::ProgramId;

/// Reasons proof construction or verification aborts. No partial proof is
/// ever produced alongside one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("constraint unsatisfied: {0}")]
    Unsatisfied(String),
    #[error("step requires a previous proof")]
    MissingPrevious,
    #[error("previous proof failed verification")]
    PriorProofRejected,
    #[error("proof belongs to program {found}, expected {expected}")]
    ProgramMismatch { expected: ProgramId, found: ProgramId },
    #[error("proof verification failed")]
    Verification,
    #[error("backend error: {0}")]
    Backend(String),
}
