//! The analysis engine facade
//!
//! Owns the processor, store, and optional remote backend, and exposes
//! the interface consumed by clients:
//! - `start_analysis(request) -> BatchId`
//! - `status(batch_id) -> BatchStatusView`
//! - `results(batch_id) -> Option<BatchResults>`

use crate::error::EngineError;
use crate::notify::{NotificationSink, TracingSink};
use crate::processor::BatchProcessor;
use crate::remote::RemoteAnalysis;
use crate::store::BatchStore;
use crate::types::{AnalysisRequest, BatchId, BatchResults, BatchStatusView, EngineConfig};
use qual_agent::{InsightGenerator, MockInsightGenerator};
use qual_document::{DocumentSource, InMemorySource};
use qual_store::{KeyValueStore, MemoryStore};
use std::sync::Arc;

/// The analysis engine
///
/// Submission is fire-and-forget relative to the caller: `start_analysis`
/// returns a batch id immediately and the batch runs to a terminal state
/// on its own.
pub struct AnalysisEngine {
    config: EngineConfig,
    store: BatchStore,
    processor: Arc<BatchProcessor>,
    remote: Option<Arc<dyn RemoteAnalysis>>,
}

impl AnalysisEngine {
    /// Start building an engine
    #[inline]
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine with the given config and default collaborators
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit an analysis
    ///
    /// When a remote backend is configured it is tried first; a remote
    /// failure is logged and recovered by the local pipeline, never
    /// surfaced to the caller.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for an unusable request and store
    /// errors from the initial record write.
    pub async fn start_analysis(&self, request: AnalysisRequest) -> Result<BatchId, EngineError> {
        if let Some(remote) = &self.remote {
            match remote.run(&request).await {
                Ok(outcome) => return self.processor.record_remote(request, outcome),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        "upstream analysis failed, falling back to local pipeline"
                    );
                }
            }
        }

        self.processor.start(request)
    }

    /// Lifecycle snapshot for a batch
    ///
    /// # Errors
    /// Returns `BatchNotFound` for unknown ids.
    pub fn status(&self, batch_id: BatchId) -> Result<BatchStatusView, EngineError> {
        let batch = self.store.require(batch_id)?;
        Ok(BatchStatusView::from(&batch))
    }

    /// Results for a batch; `None` until it completes
    ///
    /// # Errors
    /// Returns `BatchNotFound` for unknown ids.
    pub fn results(&self, batch_id: BatchId) -> Result<Option<BatchResults>, EngineError> {
        let batch = self.store.require(batch_id)?;
        Ok(batch.results)
    }

    /// Await the detached driver of a batch
    ///
    /// # Errors
    /// Returns `Driver` when the driver task aborted.
    pub async fn wait_for(&self, batch_id: BatchId) -> Result<(), EngineError> {
        self.processor.wait_for(batch_id).await
    }

    /// The underlying processor (driver registry access for callers that
    /// supervise batches)
    #[inline]
    #[must_use]
    pub fn processor(&self) -> &Arc<BatchProcessor> {
        &self.processor
    }
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("config", &self.config)
            .field("remote", &self.remote.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder wiring the engine's collaborators
///
/// Defaults: empty in-memory document source, entropy-seeded mock
/// generator, in-memory store, tracing notification sink, no remote
/// backend.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    source: Option<Arc<dyn DocumentSource>>,
    generator: Option<Arc<dyn InsightGenerator>>,
    kv: Option<Arc<dyn KeyValueStore>>,
    sink: Option<Arc<dyn NotificationSink>>,
    remote: Option<Arc<dyn RemoteAnalysis>>,
}

impl EngineBuilder {
    /// With engine configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// With a document repository
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// With an insight generator
    #[inline]
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn InsightGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// With a key-value backend for batch records
    #[inline]
    #[must_use]
    pub fn with_store(mut self, kv: Arc<dyn KeyValueStore>) -> Self {
        self.kv = Some(kv);
        self
    }

    /// With a notification sink
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// With a remote analysis backend
    #[inline]
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteAnalysis>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Build the engine
    #[must_use]
    pub fn build(self) -> AnalysisEngine {
        let kv = self
            .kv
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(InMemorySource::new()) as Arc<dyn DocumentSource>);
        let generator = self
            .generator
            .unwrap_or_else(|| Arc::new(MockInsightGenerator::new()) as Arc<dyn InsightGenerator>);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink) as Arc<dyn NotificationSink>);

        let store = BatchStore::new(kv);
        let processor = Arc::new(BatchProcessor::new(
            self.config,
            store.clone(),
            source,
            generator,
            sink,
        ));

        AnalysisEngine {
            config: self.config,
            store,
            processor,
            remote: self.remote,
        }
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
