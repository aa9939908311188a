//! Workflow scenarios driven through the public API.

mod common;

use std::sync::Arc;

use common::fixtures::{PipelineConfig, build_pipeline, laneige_request};
use petal::cache::{FileMessageStore, build_message_store};
use petal::compliance::{MockGenerator, MockJudge};
use petal::workflow::Node;

#[tokio::test]
async fn test_approved_after_two_rejections() {
    let pipeline = build_pipeline(
        PipelineConfig::default().judge(MockJudge::with_script([false, false, true])),
    )
    .await;

    let outcome = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();

    assert!(outcome.approved);
    assert_eq!(outcome.retry_count, 2);
    assert_eq!(pipeline.generator.call_count(), 3);
    assert_eq!(pipeline.judge.call_count(), 3);
    assert!(outcome.visited.contains(&Node::CacheStore));
}

#[tokio::test]
async fn test_rejected_drafts_are_never_returned() {
    let pipeline = build_pipeline(
        PipelineConfig::default()
            .generator(MockGenerator::with_drafts(["효과 100% 보장 {{customer_name}}님"]))
            .judge(MockJudge::rejecting()),
    )
    .await;

    let outcome = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();

    assert!(!outcome.approved);
    assert_eq!(outcome.retry_count, 5);
    assert_eq!(pipeline.generator.call_count(), 6);
    assert!(!outcome.message.contains("100%"));
    assert!(outcome.message.contains("지수님"));
    assert!(!outcome.visited.contains(&Node::CacheStore));
}

#[tokio::test]
async fn test_retry_ceiling_is_configurable() {
    let pipeline = build_pipeline(
        PipelineConfig::default()
            .judge(MockJudge::rejecting())
            .max_retries(2),
    )
    .await;

    let outcome = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();

    assert_eq!(outcome.retry_count, 2);
    assert_eq!(pipeline.generator.call_count(), 3);
}

#[tokio::test]
async fn test_fallback_is_stable_for_the_same_context() {
    let pipeline =
        build_pipeline(PipelineConfig::default().judge(MockJudge::rejecting())).await;

    let first = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();
    let second = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();

    assert_eq!(first.message, second.message);
    assert!(!second.cache_hit);
}

#[tokio::test]
async fn test_file_cache_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = {
        let store = build_message_store(Some(dir.path().to_path_buf()), 16).unwrap();
        let pipeline = build_pipeline(PipelineConfig::default().store(store)).await;
        pipeline
            .workflow
            .run(laneige_request("c-1", "지수"))
            .await
            .unwrap()
    };
    assert!(!first.cache_hit);

    let store = build_message_store(Some(dir.path().to_path_buf()), 16).unwrap();
    let pipeline = build_pipeline(PipelineConfig::default().store(store)).await;
    let second = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();

    assert!(second.cache_hit);
    assert_eq!(first.message, second.message);
    assert_eq!(pipeline.generator.call_count(), 0);
}

#[tokio::test]
async fn test_file_cache_writes_one_entry_per_signature() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileMessageStore::open(dir.path()).unwrap());
    let pipeline = build_pipeline(PipelineConfig::default().store(files.clone())).await;

    let first = pipeline
        .workflow
        .run(laneige_request("c-1", "지수"))
        .await
        .unwrap();
    pipeline
        .workflow
        .run(laneige_request("c-2", "민호"))
        .await
        .unwrap();

    let paths = files.entry_paths(&first.signature.unwrap()).unwrap();
    assert_eq!(paths.len(), 1);
}
