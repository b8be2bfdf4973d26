//! Mock insight generation
//!
//! Stand-in for a real model call. The processor only sees the
//! `InsightGenerator` trait, so swapping in genuine inference later does
//! not touch the pipeline.

use crate::catalog::{AgentCatalog, TOPICS};
use crate::random::{RandomSource, SeededRandom};
use crate::types::{AgentId, AgentResult};
use parking_lot::Mutex;
use qual_document::DocumentChunk;

/// Produces zero or more insight candidates for one agent and chunk
pub trait InsightGenerator: Send + Sync {
    /// Generate results for `agent_id` over `chunk`
    fn generate(&self, agent_id: &AgentId, chunk: &DocumentChunk) -> Vec<AgentResult>;
}

/// Maximum results emitted per agent/chunk call (exclusive bound)
const MAX_RESULTS_PER_CALL: usize = 3;

/// Templated mock generator
///
/// Per call emits 0–2 results. Each result substitutes a random topic
/// into a random template from the agent's profile; confidence is drawn
/// uniformly from `[0.5, 1.0)`.
pub struct MockInsightGenerator {
    rng: Mutex<Box<dyn RandomSource>>,
}

impl MockInsightGenerator {
    /// Create with entropy-seeded randomness
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_random(Box::new(SeededRandom::from_entropy()))
    }

    /// Create with a fixed seed (reproducible outputs)
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_random(Box::new(SeededRandom::new(seed)))
    }

    /// Create over an arbitrary random source
    #[inline]
    #[must_use]
    pub fn with_random(rng: Box<dyn RandomSource>) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for MockInsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockInsightGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockInsightGenerator").finish_non_exhaustive()
    }
}

impl InsightGenerator for MockInsightGenerator {
    fn generate(&self, agent_id: &AgentId, chunk: &DocumentChunk) -> Vec<AgentResult> {
        let profile = AgentCatalog::profile(agent_id);
        let mut rng = self.rng.lock();

        let count = rng.next_usize(MAX_RESULTS_PER_CALL);
        (0..count)
            .map(|_| {
                let template = profile.templates[rng.next_usize(profile.templates.len())];
                let topic = TOPICS[rng.next_usize(TOPICS.len())];
                let confidence = 0.5 + rng.next_f64() * 0.5;

                AgentResult::new(template.replace("{topic}", topic), confidence)
                    .with_provenance(&chunk.document_id, &chunk.id)
                    .with_metadata("topic", topic)
                    .with_metadata("agent", agent_id.as_str())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> DocumentChunk {
        DocumentChunk::new("doc-1", 0, "participants described their workflow")
    }

    fn drain(generator: &MockInsightGenerator, calls: usize) -> Vec<AgentResult> {
        let agent = AgentId::new("grounded-theory");
        (0..calls)
            .flat_map(|_| generator.generate(&agent, &chunk()))
            .collect()
    }

    #[test]
    fn emits_at_most_two_results_per_call() {
        let generator = MockInsightGenerator::seeded(11);
        let agent = AgentId::new("thematic-analysis");
        for _ in 0..64 {
            assert!(generator.generate(&agent, &chunk()).len() < 3);
        }
    }

    #[test]
    fn confidence_is_uniform_over_upper_half() {
        let generator = MockInsightGenerator::seeded(5);
        let results = drain(&generator, 128);
        assert!(!results.is_empty());
        for result in &results {
            assert!((0.5..1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn results_carry_chunk_provenance() {
        let generator = MockInsightGenerator::seeded(3);
        for result in drain(&generator, 64) {
            assert_eq!(result.document_id.as_deref(), Some("doc-1"));
            assert_eq!(result.chunk_id.as_deref(), Some("doc-1::chunk-0"));
            assert!(result.metadata.contains_key("topic"));
        }
    }

    #[test]
    fn same_seed_reproduces_texts_and_confidences() {
        let a = drain(&MockInsightGenerator::seeded(99), 32);
        let b = drain(&MockInsightGenerator::seeded(99), 32);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.text, y.text);
            assert!((x.confidence - y.confidence).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unknown_agent_uses_fallback_templates() {
        let generator = MockInsightGenerator::seeded(17);
        let agent = AgentId::new("not-a-methodology");
        let results: Vec<AgentResult> = (0..64)
            .flat_map(|_| generator.generate(&agent, &chunk()))
            .collect();

        assert!(!results.is_empty());
        for result in results {
            assert!(
                result.text.contains("passage") || result.text.contains("pattern"),
                "unexpected template output: {}",
                result.text
            );
        }
    }
}
