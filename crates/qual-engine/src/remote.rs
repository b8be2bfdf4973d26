//! Optional remote inference backend
//!
//! Mirrors the hosted `run-analysis` contract: the engine tries the
//! remote backend first when one is configured, and any failure is
//! recovered by running the local mock pipeline instead. The transport
//! itself is out of scope; implementations live behind this trait.

use crate::error::EngineError;
use crate::types::{AnalysisRequest, InsightSummary};
use serde::{Deserialize, Serialize};

/// Successful remote analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOutcome {
    /// Backend-side batch reference
    pub batch_id: String,
    /// Ranked insights computed remotely
    pub insights: Vec<InsightSummary>,
    /// Optional prose summary
    pub summary: Option<String>,
}

/// A remote analysis backend
#[async_trait::async_trait]
pub trait RemoteAnalysis: Send + Sync {
    /// Run the full analysis remotely
    ///
    /// # Errors
    /// Any error here is treated as `UpstreamFailure`-class: the caller
    /// logs it and falls back to the local pipeline.
    async fn run(&self, request: &AnalysisRequest) -> Result<RemoteOutcome, EngineError>;
}
