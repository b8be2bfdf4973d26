//! Batch record persistence
//!
//! Records are whole-document JSON values keyed `analysis_<batch id>`.
//! The processor is the only writer while a batch is non-terminal;
//! readers never mutate, so no locking sits above the key-value store.

use crate::error::EngineError;
use crate::status::validate_transition;
use crate::types::{AnalysisBatch, BatchId};
use qual_store::KeyValueStore;
use std::sync::Arc;

/// Store key prefix for batch records
const KEY_PREFIX: &str = "analysis_";

/// Keyed batch record store over any `KeyValueStore`
#[derive(Clone)]
pub struct BatchStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BatchStore {
    /// Create a batch store over `kv`
    #[inline]
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn key(id: BatchId) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    /// Insert a freshly queued batch record
    ///
    /// # Errors
    /// Returns store/serialization errors from the backend.
    pub fn insert(&self, batch: &AnalysisBatch) -> Result<(), EngineError> {
        let value = serde_json::to_value(batch)?;
        self.kv.set(&Self::key(batch.id), value)?;
        Ok(())
    }

    /// Replace a batch record, validating the lifecycle transition
    ///
    /// Guards the single-writer discipline: the stored status must equal
    /// the new status or be one legal transition behind it.
    ///
    /// # Errors
    /// Returns `IllegalTransition` on a forbidden status change and store
    /// errors from the backend.
    pub fn update(&self, batch: &AnalysisBatch) -> Result<(), EngineError> {
        if let Some(existing) = self.get(batch.id)? {
            if existing.status != batch.status {
                validate_transition(existing.status, batch.status)?;
            }
        }
        self.insert(batch)
    }

    /// Fetch a batch record, if present
    ///
    /// # Errors
    /// Returns store/deserialization errors from the backend.
    pub fn get(&self, id: BatchId) -> Result<Option<AnalysisBatch>, EngineError> {
        match self.kv.get(&Self::key(id))? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Fetch a batch record or fail with `BatchNotFound`
    ///
    /// # Errors
    /// Returns `BatchNotFound` for unknown ids.
    pub fn require(&self, id: BatchId) -> Result<AnalysisBatch, EngineError> {
        self.get(id)?.ok_or(EngineError::BatchNotFound(id))
    }
}

impl std::fmt::Debug for BatchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchStore").finish_non_exhaustive()
    }
}
