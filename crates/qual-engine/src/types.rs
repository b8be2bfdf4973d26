//! Core types for the analysis engine
//!
//! Defines the batch record and its lifecycle, the submission request,
//! aggregated results, and the engine configuration.

use crate::error::EngineError;
use crate::status::validate_transition;
use chrono::{DateTime, Utc};
use qual_agent::{AgentId, AgentResult, ResultId};
use qual_document::{ChunkerConfig, DocumentStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ulid::Ulid;

/// Unique batch identifier (ULID for sortability)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BatchId(pub Ulid);

impl BatchId {
    /// Generate new batch ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Batch lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Record created, no work started
    Queued,
    /// The processor is driving the batch
    Processing,
    /// Terminal: results are available
    Completed,
    /// Terminal: the batch error is recorded
    Failed,
}

impl BatchStatus {
    /// Whether this status is terminal
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// An analysis submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Owning project reference
    pub project_id: String,
    /// Ordered agent selection
    pub agent_ids: Vec<AgentId>,
}

impl AnalysisRequest {
    /// Create a request for `project_id` with the given agent selection
    #[inline]
    #[must_use]
    pub fn new(project_id: impl Into<String>, agent_ids: Vec<AgentId>) -> Self {
        Self {
            project_id: project_id.into(),
            agent_ids,
        }
    }
}

/// A ranked, human-readable insight derived from one agent's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    /// Identifier of the source result
    pub id: ResultId,
    /// Insight text
    pub text: String,
    /// Producing agent
    pub agent_id: AgentId,
    /// Curated agent display name
    pub agent_name: String,
    /// `round(confidence * 100)`, in [0, 100]
    pub relevance: u8,
    /// Title-cased methodology label derived from the agent id
    pub methodology: String,
}

/// Aggregated output of a completed batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchResults {
    /// Raw per-agent results in generation order
    pub agent_results: BTreeMap<AgentId, Vec<AgentResult>>,
    /// Ranked summaries, concatenated in agent-submission order
    pub insights: Vec<InsightSummary>,
    /// Source document statistics
    pub document_stats: DocumentStats,
}

/// One submitted analysis batch
///
/// Mutated only by the batch processor; every write replaces the whole
/// record in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBatch {
    /// Batch identifier
    pub id: BatchId,
    /// Owning project
    pub project_id: String,
    /// Ordered agent selection
    pub agent_ids: Vec<AgentId>,
    /// Lifecycle status
    pub status: BatchStatus,
    /// Percentage of chunks fully processed, 0-100
    pub progress: u8,
    /// Set once, when processing begins
    pub started_at: Option<DateTime<Utc>>,
    /// Set once, on completion
    pub completed_at: Option<DateTime<Utc>>,
    /// Present only when failed
    pub error: Option<String>,
    /// Present only when completed
    pub results: Option<BatchResults>,
}

impl AnalysisBatch {
    /// Create a freshly queued batch for a request
    #[must_use]
    pub fn queued(id: BatchId, request: &AnalysisRequest) -> Self {
        Self {
            id,
            project_id: request.project_id.clone(),
            agent_ids: request.agent_ids.clone(),
            status: BatchStatus::Queued,
            progress: 0,
            started_at: None,
            completed_at: None,
            error: None,
            results: None,
        }
    }

    /// Enter `Processing` and stamp `started_at`
    ///
    /// # Errors
    /// Returns `IllegalTransition` unless the batch is `Queued`.
    pub fn begin_processing(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        validate_transition(self.status, BatchStatus::Processing)?;
        self.status = BatchStatus::Processing;
        self.started_at.get_or_insert(now);
        Ok(())
    }

    /// Record chunk progress; values never move backwards and cap at 100
    pub fn record_progress(&mut self, percent: u8) {
        self.progress = self.progress.max(percent.min(100));
    }

    /// Enter `Completed` with aggregated results
    ///
    /// # Errors
    /// Returns `IllegalTransition` unless the batch is `Processing`.
    pub fn complete(
        &mut self,
        results: BatchResults,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        validate_transition(self.status, BatchStatus::Completed)?;
        self.status = BatchStatus::Completed;
        self.progress = 100;
        self.completed_at.get_or_insert(now);
        self.results = Some(results);
        Ok(())
    }

    /// Enter `Failed` with a human-readable message; partial results are
    /// discarded
    ///
    /// # Errors
    /// Returns `IllegalTransition` when the batch is already terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), EngineError> {
        validate_transition(self.status, BatchStatus::Failed)?;
        self.status = BatchStatus::Failed;
        self.error = Some(message.into());
        self.results = None;
        Ok(())
    }
}

/// Read-only lifecycle snapshot served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatusView {
    /// Batch identifier
    pub id: BatchId,
    /// Owning project
    pub project_id: String,
    /// Lifecycle status
    pub status: BatchStatus,
    /// Progress, 0-100
    pub progress: u8,
    /// When processing began
    pub started_at: Option<DateTime<Utc>>,
    /// When the batch completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure message, when failed
    pub error: Option<String>,
}

impl BatchStatusView {
    /// Snapshot for a batch the store has not seen yet
    ///
    /// Pollers treat an unknown batch as queued rather than erroring the
    /// consumer.
    #[must_use]
    pub fn queued_placeholder(id: BatchId) -> Self {
        Self {
            id,
            project_id: String::new(),
            status: BatchStatus::Queued,
            progress: 0,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }
}

impl From<&AnalysisBatch> for BatchStatusView {
    fn from(batch: &AnalysisBatch) -> Self {
        Self {
            id: batch.id,
            project_id: batch.project_id.clone(),
            status: batch.status,
            progress: batch.progress,
            started_at: batch.started_at,
            completed_at: batch.completed_at,
            error: batch.error.clone(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chunk window parameters
    pub chunker: ChunkerConfig,
    /// Ranked insights retained per agent
    pub insights_per_agent: usize,
    /// Simulated per-chunk latency in milliseconds (stands in for the
    /// network round trip; zero in tests)
    pub step_delay_ms: u64,
    /// Default status poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With chunker parameters
    #[inline]
    #[must_use]
    pub fn with_chunker(mut self, chunker: ChunkerConfig) -> Self {
        self.chunker = chunker;
        self
    }

    /// With insights retained per agent
    #[inline]
    #[must_use]
    pub fn with_insights_per_agent(mut self, count: usize) -> Self {
        self.insights_per_agent = count;
        self
    }

    /// With simulated per-chunk latency
    #[inline]
    #[must_use]
    pub fn with_step_delay_ms(mut self, millis: u64) -> Self {
        self.step_delay_ms = millis;
        self
    }

    /// With default poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            insights_per_agent: 3,
            step_delay_ms: 25,
            poll_interval_ms: 2000,
        }
    }
}
