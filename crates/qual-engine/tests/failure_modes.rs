//! Failure-path tests: fail-fast validation, failed batches, unknown
//! lookups, and upstream fallback.

use qual_agent::AgentId;
use qual_engine::{
    AnalysisEngine, AnalysisRequest, BatchId, BatchStatus, EngineConfig, EngineError,
    InsightSummary, RemoteOutcome,
};
use qual_document::ChunkerConfig;
use qual_test_utils::{
    sample_request, setup_empty_engine, setup_engine, FailingRemote, FailingSource, RecordingSink,
    StaticRemote,
};
use std::sync::Arc;

/// Starting analysis for a project with zero documents always yields a
/// failed batch with a no-documents error, never a completed one.
#[tokio::test]
async fn empty_project_fails_with_no_documents() {
    let fixture = setup_empty_engine(8);
    let engine = &fixture.engine;

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Failed);
    let message = status.error.expect("failure message recorded");
    assert!(message.contains("no documents"), "unexpected: {message}");

    // No partial results are published.
    assert_eq!(engine.results(batch_id).unwrap(), None);

    // The failure is notified exactly once.
    assert_eq!(
        fixture.sink.deliveries(),
        vec![(batch_id, BatchStatus::Failed)]
    );
}

/// Bad chunking parameters fail the submission itself, before any batch
/// record exists.
#[tokio::test]
async fn invalid_chunker_config_fails_fast() {
    let config = EngineConfig::new()
        .with_step_delay_ms(0)
        .with_chunker(ChunkerConfig::new().with_chunk_size(100).with_overlap(100));
    let engine = AnalysisEngine::builder()
        .with_config(config)
        .with_source(qual_test_utils::populated_source())
        .build();

    let result = engine.start_analysis(sample_request()).await;
    assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    assert_eq!(engine.processor().active_drivers(), 0);
}

#[tokio::test]
async fn empty_agent_selection_fails_fast() {
    let fixture = setup_engine(8);
    let result = fixture
        .engine
        .start_analysis(AnalysisRequest::new("p1", vec![]))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
}

#[tokio::test]
async fn source_backend_failure_terminalizes_the_batch() {
    let engine = AnalysisEngine::builder()
        .with_config(qual_test_utils::fixture_config())
        .with_source(Arc::new(FailingSource))
        .build();

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Failed);
    assert!(status.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn unknown_batch_lookups_are_rejected_not_crashed() {
    let fixture = setup_engine(8);
    let missing = BatchId::new();

    assert!(matches!(
        fixture.engine.status(missing),
        Err(EngineError::BatchNotFound(_))
    ));
    assert!(matches!(
        fixture.engine.results(missing),
        Err(EngineError::BatchNotFound(_))
    ));
}

/// An upstream failure is recovered by the local pipeline; the caller
/// sees a normal batch id and a completed batch, never the remote error.
#[tokio::test]
async fn remote_failure_falls_back_to_local_pipeline() {
    let engine = AnalysisEngine::builder()
        .with_config(qual_test_utils::fixture_config())
        .with_source(qual_test_utils::populated_source())
        .with_generator(Arc::new(qual_agent::MockInsightGenerator::seeded(31)))
        .with_remote(Arc::new(FailingRemote))
        .build();

    let batch_id = engine.start_analysis(sample_request()).await.unwrap();
    engine.wait_for(batch_id).await.unwrap();

    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Completed);
    assert!(engine.results(batch_id).unwrap().is_some());
}

#[tokio::test]
async fn remote_success_records_a_completed_batch() {
    let agent = AgentId::new("grounded-theory");
    let outcome = RemoteOutcome {
        batch_id: "remote-123".to_string(),
        insights: vec![InsightSummary {
            id: qual_agent::ResultId::new(),
            text: "Participants value informal knowledge sharing".to_string(),
            agent_id: agent.clone(),
            agent_name: "Grounded Theory".to_string(),
            relevance: 88,
            methodology: "Grounded Theory".to_string(),
        }],
        summary: Some("One dominant theme".to_string()),
    };

    let sink = RecordingSink::new();
    let engine = AnalysisEngine::builder()
        .with_config(qual_test_utils::fixture_config())
        .with_remote(Arc::new(StaticRemote { outcome }))
        .with_sink(sink.clone())
        .build();

    let batch_id = engine
        .start_analysis(AnalysisRequest::new("p1", vec![agent.clone()]))
        .await
        .unwrap();

    // The remote path is synchronous: the record is terminal on return.
    let status = engine.status(batch_id).unwrap();
    assert_eq!(status.status, BatchStatus::Completed);
    assert_eq!(status.progress, 100);

    let results = engine.results(batch_id).unwrap().unwrap();
    assert_eq!(results.insights.len(), 1);
    assert_eq!(results.insights[0].relevance, 88);
    assert!(results.agent_results[&agent].is_empty());

    assert_eq!(sink.deliveries(), vec![(batch_id, BatchStatus::Completed)]);
}
