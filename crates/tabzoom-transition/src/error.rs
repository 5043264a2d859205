use thiserror::Error;

use crate::phase::TransitionPhase;

/// Result type for transition operations.
pub type Result<T> = std::result::Result<T, TransitionError>;

/// Inputs the engines refuse. None of these are faults: the coordinator
/// logs them and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// A session is still in flight; it must complete first.
    #[error("a transition is already in flight (phase: {phase:?})")]
    Busy { phase: TransitionPhase },

    /// A drag sample arrived while no interactive session is tracking it.
    #[error("no interactive session is tracking a drag")]
    NoSession,
}
