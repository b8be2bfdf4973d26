//! End-to-end pipeline tests over the in-memory engine.
//!
//! These anchor the lifecycle contract:
//! - start_analysis returns immediately and the batch reaches Completed
//! - progress ends at exactly 100 with both timestamps stamped once
//! - results carry per-agent outputs, ranked insights, and stats
//! - terminal reads are idempotent
//! - completion is notified exactly once per batch

use qual_agent::AgentId;
use qual_document::{Document, InMemorySource};
use qual_engine::{AnalysisEngine, AnalysisRequest, BatchStatus};
use qual_test_utils::{sample_request, setup_engine, PROJECT};
use std::sync::Arc;

#[tokio::test]
async fn batch_runs_to_completed_with_full_progress() {
    let fixture = setup_engine(42);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Completed);
    assert_eq!(status.progress, 100);
    assert!(status.started_at.is_some());
    assert!(status.completed_at.is_some());
    assert!(status.error.is_none());
}

#[tokio::test]
async fn results_carry_per_agent_outputs_and_ranked_insights() {
    let fixture = setup_engine(7);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let results = engine.results(batch_id).unwrap().expect("results present");

    // Every selected agent has an entry, even if its result list is empty.
    for agent in qual_test_utils::sample_agents() {
        assert!(results.agent_results.contains_key(&agent));
    }

    // Within one agent's insights, relevance is non-increasing and each
    // entry carries the derived methodology label.
    for agent in qual_test_utils::sample_agents() {
        let relevance: Vec<u8> = results
            .insights
            .iter()
            .filter(|i| i.agent_id == agent)
            .map(|i| i.relevance)
            .collect();
        assert!(
            relevance.windows(2).all(|w| w[0] >= w[1]),
            "insights for {agent} not ranked: {relevance:?}"
        );
        assert!(relevance.len() <= 3);
    }
    for insight in &results.insights {
        assert_eq!(insight.methodology, insight.agent_id.methodology());
        assert!((1..=100).contains(&insight.relevance));
    }

    // Stats describe the fixture project: two documents, several chunks.
    assert_eq!(results.document_stats.documents, 2);
    assert!(results.document_stats.chunks > 2);
    assert!(results.document_stats.characters > 1000);
}

#[tokio::test]
async fn terminal_reads_are_idempotent() {
    let fixture = setup_engine(13);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let first_status = engine.status(batch_id).unwrap();
    let first_results = engine.results(batch_id).unwrap();
    let second_status = engine.status(batch_id).unwrap();
    let second_results = engine.results(batch_id).unwrap();

    assert_eq!(first_status, second_status);
    assert_eq!(first_results, second_results);
}

#[tokio::test]
async fn completion_is_notified_exactly_once() {
    let fixture = setup_engine(99);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    // Extra reads after the terminal state must not re-notify.
    let _ = engine.status(batch_id).unwrap();
    let _ = engine.results(batch_id).unwrap();

    let deliveries = fixture.sink.deliveries();
    assert_eq!(deliveries, vec![(batch_id, BatchStatus::Completed)]);
}

#[tokio::test]
async fn resubmission_creates_an_independent_batch() {
    let fixture = setup_engine(5);
    let engine = &fixture.engine;

    let first = engine.start_analysis(sample_request()).await.unwrap();
    let second = engine.start_analysis(sample_request()).await.unwrap();
    assert_ne!(first, second);

    engine.wait_for(first).await.unwrap();
    engine.wait_for(second).await.unwrap();

    assert_eq!(engine.status(first).unwrap().status, BatchStatus::Completed);
    assert_eq!(engine.status(second).unwrap().status, BatchStatus::Completed);
    assert_eq!(fixture.sink.deliveries().len(), 2);
}

/// A project with a single document shorter than the chunk window runs as
/// one chunk and still completes with a present (possibly empty) result
/// list for the selected agent.
#[tokio::test]
async fn single_short_document_completes_as_one_chunk() {
    let source = InMemorySource::new();
    source.insert_project(
        "solo",
        vec![Document::new("d1", "d1.txt", "x".repeat(500))],
    );

    let engine = AnalysisEngine::builder()
        .with_config(qual_engine::EngineConfig::new().with_step_delay_ms(0))
        .with_source(Arc::new(source))
        .with_generator(Arc::new(qual_agent::MockInsightGenerator::seeded(21)))
        .build();

    let agent = AgentId::new("grounded-theory");
    let batch_id = engine
        .start_analysis(AnalysisRequest::new("solo", vec![agent.clone()]))
        .await
        .unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Completed);
    assert_eq!(status.progress, 100);

    let results = engine.results(batch_id).unwrap().unwrap();
    assert_eq!(results.document_stats.chunks, 1);
    assert!(results.agent_results.contains_key(&agent));
}

#[tokio::test]
async fn driver_registry_drains_after_join() {
    let fixture = setup_engine(3);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    assert!(engine.processor().active_drivers() >= 1);

    engine.wait_for(batch_id).await.unwrap();
    assert_eq!(engine.processor().active_drivers(), 0);

    // Joining again is a no-op.
    engine.wait_for(batch_id).await.unwrap();
}

#[tokio::test]
async fn fixture_project_is_reachable_before_submission() {
    use qual_document::DocumentSource;

    let fixture = setup_engine(1);
    let documents = fixture.source.project_documents(PROJECT).await.unwrap();
    assert_eq!(documents.len(), 2);
}
