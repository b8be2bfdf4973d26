//! Batch lifecycle state machine
//!
//! A batch moves `Queued -> Processing -> {Completed | Failed}` and never
//! revisits a prior state. A batch that cannot start is allowed to fail
//! straight from `Queued` so it still reaches a terminal state.

use crate::error::EngineError;
use crate::types::BatchStatus;

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: BatchStatus) -> Vec<BatchStatus> {
    use BatchStatus::{Completed, Failed, Processing, Queued};
    match from {
        Queued => vec![Processing, Failed],
        Processing => vec![Completed, Failed],
        Completed | Failed => vec![],
    }
}

/// Validate a lifecycle transition
///
/// # Errors
/// Returns `EngineError::IllegalTransition` when the state machine does
/// not permit `from -> to`.
pub fn validate_transition(from: BatchStatus, to: BatchStatus) -> Result<(), EngineError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(EngineError::IllegalTransition { from, to })
    }
}
