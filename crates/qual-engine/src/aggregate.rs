//! Result aggregation
//!
//! Reduces raw per-chunk agent outputs into a fixed number of top
//! insights per agent, ranked by confidence. The retained count is fixed
//! rather than randomized so insight counts are reproducible.

use crate::types::{BatchResults, InsightSummary};
use qual_agent::{AgentCatalog, AgentId, AgentResult};
use qual_document::DocumentStats;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Aggregates raw agent results into ranked insight summaries
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    insights_per_agent: usize,
}

impl ResultAggregator {
    /// Create an aggregator retaining `insights_per_agent` per agent
    #[inline]
    #[must_use]
    pub fn new(insights_per_agent: usize) -> Self {
        Self { insights_per_agent }
    }

    /// Build batch results from raw per-agent outputs
    ///
    /// Per agent: stable sort by confidence descending (ties keep
    /// generation order), retain the top entries, and map each to an
    /// `InsightSummary`. The output concatenates agents in submission
    /// order; there is no cross-agent global ranking.
    #[must_use]
    pub fn aggregate(
        &self,
        agent_ids: &[AgentId],
        agent_results: BTreeMap<AgentId, Vec<AgentResult>>,
        document_stats: DocumentStats,
    ) -> BatchResults {
        let mut insights = Vec::new();

        for agent_id in agent_ids {
            let Some(results) = agent_results.get(agent_id) else {
                continue;
            };

            let mut ranked: Vec<&AgentResult> = results.iter().collect();
            ranked.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            });

            insights.extend(ranked.into_iter().take(self.insights_per_agent).map(
                |result| InsightSummary {
                    id: result.id,
                    text: result.text.clone(),
                    agent_id: agent_id.clone(),
                    agent_name: AgentCatalog::display_name(agent_id),
                    relevance: relevance_of(result.confidence),
                    methodology: agent_id.methodology(),
                },
            ));
        }

        BatchResults {
            agent_results,
            insights,
            document_stats,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(3)
    }
}

/// `round(confidence * 100)` clamped into [0, 100]
fn relevance_of(confidence: f64) -> u8 {
    let scaled = (confidence * 100.0).round().clamp(0.0, 100.0);
    u8::try_from(scaled as u64).unwrap_or(100)
}
