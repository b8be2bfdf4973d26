//! QualAgents analysis engine
//!
//! The batch analysis pipeline:
//! - Chunks project documents into overlapping windows
//! - Runs every selected methodology agent over every chunk
//! - Aggregates raw results into ranked insight summaries
//! - Tracks batch lifecycle in a polled status store
//!
//! # Example
//!
//! ```rust,ignore
//! use qual_engine::{AnalysisEngine, AnalysisRequest, EngineConfig};
//! use qual_agent::AgentId;
//!
//! # async fn example() -> Result<(), qual_engine::EngineError> {
//! let engine = AnalysisEngine::new(EngineConfig::new());
//!
//! let request = AnalysisRequest::new("p1", vec![AgentId::new("grounded-theory")]);
//! let batch_id = engine.start_analysis(request).await?;
//!
//! engine.wait_for(batch_id).await?;
//! let results = engine.results(batch_id)?;
//! println!("{} insights", results.map_or(0, |r| r.insights.len()));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod notify;
pub mod poller;
pub mod processor;
pub mod remote;
pub mod status;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use aggregate::ResultAggregator;
pub use engine::{AnalysisEngine, EngineBuilder};
pub use error::EngineError;
pub use notify::{NotificationSink, TracingSink};
pub use poller::{PollOutcome, PollSubscription, StatusPoller};
pub use processor::BatchProcessor;
pub use remote::{RemoteAnalysis, RemoteOutcome};
pub use store::BatchStore;
pub use types::{
    AnalysisBatch, AnalysisRequest, BatchId, BatchResults, BatchStatus, BatchStatusView,
    EngineConfig, InsightSummary,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the analysis engine
    pub use crate::{
        AnalysisEngine, AnalysisRequest, BatchId, BatchResults, BatchStatus, EngineConfig,
        EngineError, StatusPoller,
    };
    pub use qual_agent::AgentId;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
