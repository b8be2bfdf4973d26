//! Batch processor
//!
//! Drives a submitted batch through its lifecycle:
//! - Validates the request before any state mutation
//! - Writes the queued record and detaches a driver task
//! - Chunks project documents and runs every agent over every chunk
//! - Writes monotone progress after each fully processed chunk
//! - Terminalizes to completed/failed and notifies exactly once
//!
//! `start` returns as soon as the queued record exists; driver errors are
//! captured into the batch record, never propagated to the caller.

use crate::aggregate::ResultAggregator;
use crate::error::EngineError;
use crate::notify::NotificationSink;
use crate::remote::RemoteOutcome;
use crate::store::BatchStore;
use crate::types::{AnalysisBatch, AnalysisRequest, BatchId, BatchResults, EngineConfig};
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use futures::future::join_all;
use qual_agent::{AgentId, AgentResult, InsightGenerator};
use qual_document::{Chunker, DocumentSource, DocumentStats};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Orchestrates chunking, generation, aggregation, and status writes
pub struct BatchProcessor {
    config: EngineConfig,
    store: BatchStore,
    source: Arc<dyn DocumentSource>,
    generator: Arc<dyn InsightGenerator>,
    aggregator: ResultAggregator,
    sink: Arc<dyn NotificationSink>,
    /// Batches already notified (at most one notification per batch)
    notified: DashSet<BatchId>,
    /// Detached driver tasks, joinable through `wait_for`
    tasks: DashMap<BatchId, JoinHandle<()>>,
}

impl BatchProcessor {
    /// Create a processor over the injected collaborators
    #[must_use]
    pub fn new(
        config: EngineConfig,
        store: BatchStore,
        source: Arc<dyn DocumentSource>,
        generator: Arc<dyn InsightGenerator>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            aggregator: ResultAggregator::new(config.insights_per_agent),
            config,
            store,
            source,
            generator,
            sink,
            notified: DashSet::new(),
            tasks: DashMap::new(),
        }
    }

    /// Submit a batch and detach its driver task
    ///
    /// Returns once the queued record is persisted. Two submissions of
    /// the same logical request produce two independent batches.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for an empty agent selection or
    /// unusable chunking parameters, and store errors from the initial
    /// record write. Driver failures never surface here.
    pub fn start(self: &Arc<Self>, request: AnalysisRequest) -> Result<BatchId, EngineError> {
        let request = Self::validate_request(request)?;
        Chunker::new(self.config.chunker)?;

        let id = BatchId::new();
        let batch = AnalysisBatch::queued(id, &request);
        self.store.insert(&batch)?;
        tracing::info!(
            batch = %id,
            project = %request.project_id,
            agents = request.agent_ids.len(),
            "analysis batch queued"
        );

        let processor = Arc::clone(self);
        let handle = tokio::spawn(async move { processor.drive(id).await });
        self.tasks.insert(id, handle);

        Ok(id)
    }

    /// Record a batch whose analysis ran on the remote backend
    ///
    /// The record passes through the normal lifecycle so readers observe
    /// the same state machine as for local batches.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for an empty agent selection and
    /// store errors from record writes.
    pub fn record_remote(
        &self,
        request: AnalysisRequest,
        outcome: RemoteOutcome,
    ) -> Result<BatchId, EngineError> {
        let request = Self::validate_request(request)?;

        let id = BatchId::new();
        let mut batch = AnalysisBatch::queued(id, &request);
        self.store.insert(&batch)?;

        batch.begin_processing(Utc::now())?;
        self.store.update(&batch)?;

        let agent_results: BTreeMap<AgentId, Vec<AgentResult>> = request
            .agent_ids
            .iter()
            .cloned()
            .map(|agent| (agent, Vec::new()))
            .collect();
        let results = BatchResults {
            agent_results,
            insights: outcome.insights,
            document_stats: DocumentStats::default(),
        };
        batch.complete(results, Utc::now())?;
        self.store.update(&batch)?;

        tracing::info!(batch = %id, remote = %outcome.batch_id, "remote analysis recorded");
        self.notify_once(&batch);
        Ok(id)
    }

    /// Await the driver task of a batch, if it is still registered
    ///
    /// Re-joining an already joined (or unknown) batch is a no-op, so
    /// callers can use this unconditionally before reading results.
    ///
    /// # Errors
    /// Returns `Driver` when the detached task aborted or panicked.
    pub async fn wait_for(&self, id: BatchId) -> Result<(), EngineError> {
        let Some((_, handle)) = self.tasks.remove(&id) else {
            return Ok(());
        };
        handle
            .await
            .map_err(|error| EngineError::Driver(error.to_string()))
    }

    /// Number of driver tasks still registered
    #[inline]
    #[must_use]
    pub fn active_drivers(&self) -> usize {
        self.tasks.len()
    }

    /// Reject empty selections and deduplicate agents, keeping first
    /// occurrence order
    fn validate_request(mut request: AnalysisRequest) -> Result<AnalysisRequest, EngineError> {
        if request.agent_ids.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "at least one agent must be selected".to_string(),
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        request.agent_ids.retain(|agent| seen.insert(agent.clone()));
        Ok(request)
    }

    /// Driver entry point: run the batch, capturing any error into the
    /// record
    async fn drive(&self, id: BatchId) {
        if let Err(error) = self.run_batch(id).await {
            tracing::error!(batch = %id, %error, "analysis batch failed");
            self.terminalize_failure(id, &error);
        }
    }

    async fn run_batch(&self, id: BatchId) -> Result<(), EngineError> {
        let mut batch = self.store.require(id)?;
        batch.begin_processing(Utc::now())?;
        self.store.update(&batch)?;
        tracing::info!(batch = %id, project = %batch.project_id, "analysis batch processing");

        let documents = self.source.project_documents(&batch.project_id).await?;
        if documents.is_empty() {
            return Err(EngineError::NoDocuments(batch.project_id.clone()));
        }

        let chunker = Chunker::new(self.config.chunker)?;
        let chunks = chunker.chunk_documents(&documents);
        let document_stats = DocumentStats::collect(&documents, &chunks);
        let total = chunks.len();
        tracing::debug!(
            batch = %id,
            documents = documents.len(),
            chunks = total,
            "chunked project documents"
        );

        let step_delay = Duration::from_millis(self.config.step_delay_ms);
        let mut agent_results: BTreeMap<AgentId, Vec<AgentResult>> = batch
            .agent_ids
            .iter()
            .cloned()
            .map(|agent| (agent, Vec::new()))
            .collect();

        for (processed, chunk) in chunks.iter().enumerate() {
            if !step_delay.is_zero() {
                tokio::time::sleep(step_delay).await;
            }

            // A chunk counts toward progress only once every agent's
            // output for it has been recorded.
            let outputs = join_all(batch.agent_ids.iter().map(|agent_id| {
                let generator = Arc::clone(&self.generator);
                async move { (agent_id.clone(), generator.generate(agent_id, chunk)) }
            }))
            .await;

            for (agent_id, results) in outputs {
                if let Some(entry) = agent_results.get_mut(&agent_id) {
                    entry.extend(results);
                }
            }

            let progress = u8::try_from((processed + 1) * 100 / total).unwrap_or(100);
            batch.record_progress(progress);
            self.store.update(&batch)?;
            tracing::debug!(batch = %id, progress = batch.progress, "chunk processed");
        }

        let results = self
            .aggregator
            .aggregate(&batch.agent_ids, agent_results, document_stats);
        batch.complete(results, Utc::now())?;
        self.store.update(&batch)?;
        self.notify_once(&batch);
        tracing::info!(batch = %id, "analysis batch completed");
        Ok(())
    }

    /// Best-effort transition to `Failed` with the captured error
    fn terminalize_failure(&self, id: BatchId, error: &EngineError) {
        let mut batch = match self.store.get(id) {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                tracing::warn!(batch = %id, "failed batch record missing");
                return;
            }
            Err(store_error) => {
                tracing::error!(batch = %id, %store_error, "could not load failed batch");
                return;
            }
        };

        if batch.status.is_terminal() {
            return;
        }
        if let Err(transition_error) = batch.fail(error.to_string()) {
            tracing::error!(batch = %id, %transition_error, "could not mark batch failed");
            return;
        }
        if let Err(store_error) = self.store.update(&batch) {
            tracing::error!(batch = %id, %store_error, "could not persist failed batch");
            return;
        }
        self.notify_once(&batch);
    }

    fn notify_once(&self, batch: &AnalysisBatch) {
        if self.notified.insert(batch.id) {
            self.sink.notify(batch);
        }
    }
}

impl std::fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("config", &self.config)
            .field("active_drivers", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qual_agent::AgentId;

    #[test]
    fn empty_agent_selection_is_rejected() {
        let request = AnalysisRequest::new("p1", vec![]);
        assert!(matches!(
            BatchProcessor::validate_request(request),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn duplicate_agents_collapse_to_first_occurrence_order() {
        let request = AnalysisRequest::new(
            "p1",
            vec![
                AgentId::new("thematic-analysis"),
                AgentId::new("grounded-theory"),
                AgentId::new("thematic-analysis"),
            ],
        );

        let validated = BatchProcessor::validate_request(request).unwrap();
        let slugs: Vec<&str> = validated.agent_ids.iter().map(AgentId::as_str).collect();
        assert_eq!(slugs, vec!["thematic-analysis", "grounded-theory"]);
    }
}
