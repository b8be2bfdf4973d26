//! Error types for the analysis engine
//!
//! Covers the full pipeline taxonomy:
//! - Fail-fast request validation
//! - Empty document sets
//! - Upstream (remote backend) failures, recovered locally
//! - Unknown batch lookups
//! - Store and lifecycle violations

use crate::types::{BatchId, BatchStatus};
use qual_document::{ChunkerError, SourceError};
use qual_store::StoreError;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Unusable request or chunking parameters; raised before any state
    /// mutation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The project resolved to zero documents
    #[error("no documents available for project: {0}")]
    NoDocuments(String),

    /// The optional remote backend failed
    #[error("upstream analysis failed: {0}")]
    Upstream(String),

    /// Status/result lookup for an unknown batch id
    #[error("analysis batch not found: {0}")]
    BatchNotFound(BatchId),

    /// Attempted lifecycle transition the state machine forbids
    #[error("illegal batch transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current status
        from: BatchStatus,
        /// Requested status
        to: BatchStatus,
    },

    /// Batch record persistence failed
    #[error("batch store error: {0}")]
    Store(#[from] StoreError),

    /// Batch record could not be encoded or decoded
    #[error("batch record error: {0}")]
    Record(#[from] serde_json::Error),

    /// The document repository failed
    #[error("document source error: {0}")]
    Source(#[from] SourceError),

    /// A detached batch driver task aborted
    #[error("batch driver failed: {0}")]
    Driver(String),
}

impl EngineError {
    /// Whether the engine recovers from this error by falling back to the
    /// local mock pipeline
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

impl From<ChunkerError> for EngineError {
    fn from(error: ChunkerError) -> Self {
        Self::InvalidConfiguration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_recoverable() {
        assert!(EngineError::Upstream("503".into()).is_recoverable());
        assert!(!EngineError::NoDocuments("p1".into()).is_recoverable());
        assert!(!EngineError::InvalidConfiguration("bad".into()).is_recoverable());
    }

    #[test]
    fn chunker_errors_map_to_invalid_configuration() {
        let err: EngineError =
            ChunkerError::InvalidConfiguration("overlap too large".into()).into();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("overlap too large"));
    }
}
