//! End-to-end HTTP tests.

mod common;

use common::fixtures::{PipelineConfig, message_body};
use common::harness::{TestServerConfig, spawn_test_server};
use common::http_client::TestClient;
use petal::compliance::MockJudge;
use petal::constants::{PETAL_STATUS_FALLBACK, PETAL_STATUS_GENERATED, PETAL_STATUS_HIT};

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let health = client.health().await.expect("Health check should succeed");

    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_ready_endpoint_indicates_dependencies() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let ready = client.ready().await.expect("Ready check should succeed");

    assert!(ready.is_ok(), "Server should report ready");
    assert_eq!(ready.components.http, "ready");
    assert_eq!(ready.components.embedder_mode, "stub");
    assert_eq!(ready.components.provider_mode, "mock");
}

#[tokio::test]
async fn test_message_lifecycle_generated_then_hit() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let (first, status1) = client.message(&message_body("c-1", "지수")).await.unwrap();
    assert_eq!(status1, PETAL_STATUS_GENERATED);
    assert!(first.approved);
    assert!(!first.cache_hit);

    let (second, status2) = client.message(&message_body("c-1", "지수")).await.unwrap();
    assert_eq!(status2, PETAL_STATUS_HIT);
    assert!(second.cache_hit);
    assert_eq!(first.message.as_bytes(), second.message.as_bytes());
    assert_eq!(first.signature, second.signature);
    assert_eq!(server.pipeline.generator.call_count(), 1);
}

#[tokio::test]
async fn test_cached_template_is_personalized_per_customer() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let (first, _) = client.message(&message_body("c-1", "지수")).await.unwrap();
    let (second, status) = client.message(&message_body("c-2", "민호")).await.unwrap();

    assert_eq!(status, PETAL_STATUS_HIT);
    assert!(first.message.contains("지수님"));
    assert!(second.message.contains("민호님"));
    assert!(!second.message.contains("{{customer_name}}"));
}

#[tokio::test]
async fn test_exhausted_retries_return_fallback() {
    let config = TestServerConfig {
        pipeline: PipelineConfig::default().judge(MockJudge::rejecting()),
    };
    let server = spawn_test_server(config).await.unwrap();
    let client = TestClient::new(server.url());

    let (body, status) = client.message(&message_body("c-1", "지수")).await.unwrap();

    assert_eq!(status, PETAL_STATUS_FALLBACK);
    assert!(!body.approved);
    assert_eq!(body.retry_count, 5);
    assert!(body.message.starts_with("[라네즈]"));
    assert_eq!(server.pipeline.generator.call_count(), 6);

    // Fallbacks are not cached.
    let (_, status) = client.message(&message_body("c-1", "지수")).await.unwrap();
    assert_eq!(status, PETAL_STATUS_FALLBACK);
}

#[tokio::test]
async fn test_disable_cache_always_generates() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    let client = TestClient::new(server.url());
    let mut body = message_body("c-1", "지수");
    body["disable_cache"] = serde_json::json!(true);

    let (_, first) = client.message(&body).await.unwrap();
    let (_, second) = client.message(&body).await.unwrap();

    assert_eq!(first, PETAL_STATUS_GENERATED);
    assert_eq!(second, PETAL_STATUS_GENERATED);
    assert_eq!(server.pipeline.generator.call_count(), 2);
}

#[tokio::test]
async fn test_invalid_intent_is_bad_request() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    let client = TestClient::new(server.url());
    let mut body = message_body("c-1", "지수");
    body["intent"] = serde_json::json!("clearance");

    let (code, err) = client.message_error(&body).await.unwrap();

    assert_eq!(code, 400);
    assert_eq!(err.code, 400);
}

#[tokio::test]
async fn test_retrieval_outage_is_service_unavailable() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    server.pipeline.index.set_fail_searches(true);
    let client = TestClient::new(server.url());

    let (code, _) = client.message_error(&message_body("c-1", "지수")).await.unwrap();

    assert_eq!(code, 503);
}

#[tokio::test]
async fn test_recommendations_are_ranked_by_final_score() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .unwrap();
    let client = TestClient::new(server.url());
    let body = serde_json::json!({
        "customer": {"customer_id": "c-1", "skin_type": "dry", "keywords": ["보습"]},
        "intent": "regular",
        "top_k": 3
    });

    let response = client.recommendations(&body).await.unwrap();

    assert!(!response.candidates.is_empty());
    assert!(response.candidates.len() <= 3);
    assert!(
        response
            .candidates
            .windows(2)
            .all(|w| w[0].final_score >= w[1].final_score)
    );
}
