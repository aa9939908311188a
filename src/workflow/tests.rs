use super::*;
use crate::cache::MockMessageStore;
use crate::catalog::{MemoryCatalog, product_points};
use crate::channel::Channel;
use crate::compliance::{
    ComplianceConfig, FallbackCatalog, MockGenerator, MockJudge, RuleIndex, builtin_rules,
};
use crate::embedding::{MockEmbedder, MockPairScorer};
use crate::intent::Intent;
use crate::persona::PersonaCatalog;
use crate::profile::CustomerProfile;
use crate::ranking::{RankingConfig, RankingError};
use crate::vectordb::MockProductIndex;

struct Harness {
    workflow: Workflow,
    embedder: Arc<MockEmbedder>,
    store: Arc<MockMessageStore>,
    generator: Arc<MockGenerator>,
}

async fn harness_with(generator: MockGenerator, judge: MockJudge) -> Harness {
    let embedder = Arc::new(MockEmbedder::new(64));
    let catalog = MemoryCatalog::builtin();
    let index = Arc::new(MockProductIndex::new());
    index
        .upsert(product_points(catalog.products(), embedder.as_ref()).await.unwrap())
        .unwrap();

    let ranking = Arc::new(RankingEngine::new(
        embedder.clone(),
        index,
        Arc::new(catalog),
        Arc::new(MockPairScorer::new(0.0)),
        RankingConfig::default(),
    ));

    let generator = Arc::new(generator);
    let rules = Arc::new(RuleIndex::build(builtin_rules(), embedder.clone()).await.unwrap());
    let compliance = Arc::new(ComplianceLoop::new(
        generator.clone(),
        Arc::new(judge),
        rules,
        Arc::new(FallbackCatalog::builtin()),
        ComplianceConfig::default(),
    ));

    let store = Arc::new(MockMessageStore::new());
    let brands = BrandScorer::new(Arc::new(PersonaCatalog::builtin()), "Laneige");

    Harness {
        workflow: Workflow::new(brands, ranking, store.clone(), compliance),
        embedder,
        store,
        generator,
    }
}

async fn harness() -> Harness {
    harness_with(MockGenerator::new(), MockJudge::new()).await
}

fn request(name: &str) -> WorkflowRequest {
    let profile = CustomerProfile::new(format!("id-{name}"))
        .name(name)
        .skin_types(["dry"])
        .concerns(["dryness"])
        .keywords(["vegan"])
        .normalized();
    WorkflowRequest::new(profile)
        .channel(Channel::AppPush)
        .intent(Intent::Regular)
        .brand("Laneige")
}

#[tokio::test]
async fn test_second_identical_request_is_a_byte_identical_hit() {
    let h = harness().await;

    let first = h.workflow.run(request("지수")).await.unwrap();
    let second = h.workflow.run(request("지수")).await.unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.message.as_bytes(), second.message.as_bytes());
    assert_eq!(first.signature, second.signature);
    assert_eq!(h.generator.call_count(), 1);
    assert_eq!(second.status(), PETAL_STATUS_HIT);
}

#[tokio::test]
async fn test_miss_visits_every_node_in_order() {
    let h = harness().await;

    let outcome = h.workflow.run(request("지수")).await.unwrap();

    assert_eq!(
        outcome.visited,
        vec![
            Node::ResolveBrand,
            Node::RetrieveCandidates,
            Node::CacheLookup,
            Node::ComplianceLoop,
            Node::CacheStore,
            Node::Finalize,
        ]
    );
    assert_eq!(outcome.status(), PETAL_STATUS_GENERATED);
    assert_eq!(outcome.brand, "Laneige");
    assert!(outcome.product.is_some());
}

#[tokio::test]
async fn test_cache_stores_template_and_personalizes_per_customer() {
    let h = harness().await;

    let first = h.workflow.run(request("지수")).await.unwrap();
    let second = h.workflow.run(request("민호")).await.unwrap();

    assert!(second.cache_hit);
    assert!(first.message.contains("지수님"));
    assert!(second.message.contains("민호님"));
    assert!(!second.message.contains("{{customer_name}}"));

    let stored = h.store.inner().entries(&first.signature.unwrap());
    assert_eq!(stored.len(), 1);
    assert!(stored[0].message.contains("{{customer_name}}"));
}

#[tokio::test]
async fn test_disable_cache_bypasses_lookup_and_store() {
    let h = harness().await;

    h.workflow.run(request("지수").disable_cache(true)).await.unwrap();
    let second = h.workflow.run(request("지수").disable_cache(true)).await.unwrap();

    assert!(!second.cache_hit);
    assert_eq!(h.store.lookup_count(), 0);
    assert_eq!(h.store.store_count(), 0);
    assert_eq!(h.generator.call_count(), 2);
}

#[tokio::test]
async fn test_exhaustion_returns_fallback_and_skips_store() {
    let h = harness_with(MockGenerator::new(), MockJudge::rejecting()).await;

    let outcome = h.workflow.run(request("지수")).await.unwrap();

    assert!(!outcome.approved);
    assert_eq!(outcome.retry_count, 5);
    assert_eq!(outcome.status(), PETAL_STATUS_FALLBACK);
    assert!(outcome.message.contains("지수님"));
    assert!(!outcome.visited.contains(&Node::CacheStore));
    assert_eq!(h.store.store_count(), 0);
}

#[tokio::test]
async fn test_approved_after_retries_reports_retry_count() {
    let h = harness_with(MockGenerator::new(), MockJudge::with_script([false, false, true])).await;

    let outcome = h.workflow.run(request("지수")).await.unwrap();

    assert!(outcome.approved);
    assert_eq!(outcome.retry_count, 2);
    assert_eq!(h.store.store_count(), 1);
}

#[tokio::test]
async fn test_lookup_failure_is_treated_as_miss() {
    let h = harness().await;
    h.store.set_fail_lookups(true);

    let outcome = h.workflow.run(request("지수")).await.unwrap();

    assert!(!outcome.cache_hit);
    assert!(outcome.approved);
    assert_eq!(h.generator.call_count(), 1);
}

#[tokio::test]
async fn test_store_failure_is_not_fatal() {
    let h = harness().await;
    h.store.set_fail_stores(true);

    let outcome = h.workflow.run(request("지수")).await.unwrap();

    assert!(outcome.approved);
    assert_eq!(h.store.store_count(), 1);
    assert!(h.store.inner().is_empty());
}

#[tokio::test]
async fn test_retrieval_failure_ends_the_request() {
    let h = harness().await;
    h.embedder.set_fail(true);

    let err = h.workflow.run(request("지수")).await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Ranking(RankingError::RetrievalUnavailable { .. })
    ));
    assert!(!err.is_internal());
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_brand_reports_filter() {
    let h = harness().await;

    let err = h
        .workflow
        .run(request("지수").brand("NoSuchBrand"))
        .await
        .unwrap_err();

    match err {
        WorkflowError::Ranking(RankingError::NoCandidatesForBrandFilter { brands }) => {
            assert_eq!(brands, vec!["NoSuchBrand".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_persona_drives_brand_choice() {
    let h = harness().await;
    let mut req = request("지수");
    req.brand = None;

    let outcome = h.workflow.run(req.persona("1")).await.unwrap();

    assert!(["Sulwhasoo", "Hera"].contains(&outcome.brand.as_str()));
}

#[test]
fn test_context_rejects_reentry() {
    let mut ctx = WorkflowContext::new(WorkflowRequest::default());

    ctx.enter(Node::CacheLookup).unwrap();
    let err = ctx.enter(Node::CacheLookup).unwrap_err();

    assert!(matches!(err, WorkflowError::NodeReentered { node: Node::CacheLookup }));
    assert!(err.is_internal());
}

#[test]
fn test_context_trims_weather_and_persona() {
    let ctx = WorkflowContext::new(WorkflowRequest::default().weather(" 폭염 "));
    assert_eq!(ctx.weather(), "폭염");
    assert_eq!(ctx.persona_id(), "");
}
