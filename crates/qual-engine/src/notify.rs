//! Terminal-state notifications
//!
//! A sink is invoked at most once per batch, on completion or failure.
//! Deduplication lives in the processor, keyed by batch id.

use crate::types::{AnalysisBatch, BatchStatus};

/// Receives one notification per terminal batch
pub trait NotificationSink: Send + Sync {
    /// Fired when `batch` reaches a terminal state
    fn notify(&self, batch: &AnalysisBatch);
}

/// Default sink: emits through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, batch: &AnalysisBatch) {
        match batch.status {
            BatchStatus::Completed => {
                let insights = batch
                    .results
                    .as_ref()
                    .map_or(0, |results| results.insights.len());
                tracing::info!(batch = %batch.id, insights, "analysis completed");
            }
            BatchStatus::Failed => {
                tracing::warn!(
                    batch = %batch.id,
                    error = batch.error.as_deref().unwrap_or("unknown"),
                    "analysis failed"
                );
            }
            BatchStatus::Queued | BatchStatus::Processing => {
                tracing::debug!(batch = %batch.id, "ignoring non-terminal notification");
            }
        }
    }
}
