//! Testing utilities for the QualAgents workspace
//!
//! Shared fixtures, recording doubles, and engine setup helpers.

#![allow(missing_docs)]

use parking_lot::Mutex;
use qual_agent::{AgentId, MockInsightGenerator};
use qual_document::{ChunkerConfig, Document, DocumentSource, InMemorySource, SourceError};
use qual_engine::{
    AnalysisBatch, AnalysisEngine, AnalysisRequest, BatchId, BatchStatus, EngineConfig,
    EngineError, NotificationSink, RemoteAnalysis, RemoteOutcome,
};
use std::sync::Arc;

/// Project id used by all fixtures
pub const PROJECT: &str = "p1";

/// Two small interview transcripts; the first spans multiple chunks with
/// the fixture chunker config, the second fits in one.
#[must_use]
pub fn sample_documents() -> Vec<Document> {
    let long: String =
        "The participant described their onboarding as confusing but improving. "
            .repeat(20);
    vec![
        Document::new("doc-long", "interview-01.txt", long)
            .with_metadata("kind", "interview"),
        Document::new(
            "doc-short",
            "interview-02.txt",
            "Short follow-up note about tool adoption.",
        ),
    ]
}

/// Agent selection used by most tests
#[must_use]
pub fn sample_agents() -> Vec<AgentId> {
    vec![
        AgentId::new("grounded-theory"),
        AgentId::new("thematic-analysis"),
    ]
}

/// Request against the fixture project
#[must_use]
pub fn sample_request() -> AnalysisRequest {
    AnalysisRequest::new(PROJECT, sample_agents())
}

/// Source pre-populated with the fixture project
#[must_use]
pub fn populated_source() -> Arc<InMemorySource> {
    let source = InMemorySource::new();
    source.insert_project(PROJECT, sample_documents());
    Arc::new(source)
}

/// Chunker parameters that split the long fixture document into several
/// chunks
#[must_use]
pub fn fixture_chunker() -> ChunkerConfig {
    ChunkerConfig::new().with_chunk_size(400).with_overlap(80)
}

/// Engine config for tests: fixture chunker, no simulated latency
#[must_use]
pub fn fixture_config() -> EngineConfig {
    EngineConfig::new()
        .with_chunker(fixture_chunker())
        .with_step_delay_ms(0)
}

/// Notification sink that records every delivery
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(BatchId, BatchStatus)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Notifications delivered so far, in order
    #[must_use]
    pub fn deliveries(&self) -> Vec<(BatchId, BatchStatus)> {
        self.events.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, batch: &AnalysisBatch) {
        self.events.lock().push((batch.id, batch.status));
    }
}

/// A populated engine plus its recording sink
#[derive(Debug)]
pub struct TestEngine {
    pub engine: Arc<AnalysisEngine>,
    pub sink: Arc<RecordingSink>,
    pub source: Arc<InMemorySource>,
}

/// Engine over the fixture project with seeded generation and a recording
/// sink
#[must_use]
pub fn setup_engine(seed: u64) -> TestEngine {
    let sink = RecordingSink::new();
    let source = populated_source();
    let engine = AnalysisEngine::builder()
        .with_config(fixture_config())
        .with_source(source.clone())
        .with_generator(Arc::new(MockInsightGenerator::seeded(seed)))
        .with_sink(sink.clone())
        .build();

    TestEngine {
        engine: Arc::new(engine),
        sink,
        source,
    }
}

/// Engine whose project has no documents
#[must_use]
pub fn setup_empty_engine(seed: u64) -> TestEngine {
    let sink = RecordingSink::new();
    let source = Arc::new(InMemorySource::new());
    let engine = AnalysisEngine::builder()
        .with_config(fixture_config())
        .with_source(source.clone())
        .with_generator(Arc::new(MockInsightGenerator::seeded(seed)))
        .with_sink(sink.clone())
        .build();

    TestEngine {
        engine: Arc::new(engine),
        sink,
        source,
    }
}

/// Document source whose backend always fails
#[derive(Debug, Default)]
pub struct FailingSource;

#[async_trait::async_trait]
impl DocumentSource for FailingSource {
    async fn project_documents(&self, _project_id: &str) -> Result<Vec<Document>, SourceError> {
        Err(SourceError::Backend("connection refused".to_string()))
    }
}

/// Remote backend that always fails (exercises the local fallback)
#[derive(Debug, Default)]
pub struct FailingRemote;

#[async_trait::async_trait]
impl RemoteAnalysis for FailingRemote {
    async fn run(&self, _request: &AnalysisRequest) -> Result<RemoteOutcome, EngineError> {
        Err(EngineError::Upstream("503 service unavailable".to_string()))
    }
}

/// Remote backend returning a fixed outcome
#[derive(Debug)]
pub struct StaticRemote {
    pub outcome: RemoteOutcome,
}

#[async_trait::async_trait]
impl RemoteAnalysis for StaticRemote {
    async fn run(&self, _request: &AnalysisRequest) -> Result<RemoteOutcome, EngineError> {
        Ok(self.outcome.clone())
    }
}
