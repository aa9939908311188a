//! Pipeline assembly and sample inputs shared by the integration tests.

use std::sync::Arc;

use petal::cache::{MemoryMessageStore, MessageStore};
use petal::catalog::{MemoryCatalog, product_points};
use petal::channel::Channel;
use petal::compliance::{
    ComplianceConfig, ComplianceLoop, FallbackCatalog, MockGenerator, MockJudge, RuleIndex,
    builtin_rules,
};
use petal::embedding::{MockEmbedder, MockPairScorer};
use petal::intent::Intent;
use petal::persona::{BrandScorer, PersonaCatalog};
use petal::profile::CustomerProfile;
use petal::ranking::{RankingConfig, RankingEngine};
use petal::vectordb::MockProductIndex;
use petal::workflow::{Workflow, WorkflowRequest};

pub const EMBEDDING_DIM: usize = 64;

pub struct PipelineConfig {
    pub generator: MockGenerator,
    pub judge: MockJudge,
    pub store: Arc<dyn MessageStore>,
    pub max_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generator: MockGenerator::new(),
            judge: MockJudge::new(),
            store: Arc::new(MemoryMessageStore::new()),
            max_retries: 5,
        }
    }
}

impl PipelineConfig {
    pub fn generator(mut self, generator: MockGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn judge(mut self, judge: MockJudge) -> Self {
        self.judge = judge;
        self
    }

    pub fn store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = store;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

pub struct Pipeline {
    pub workflow: Arc<Workflow>,
    pub embedder: Arc<MockEmbedder>,
    pub index: Arc<MockProductIndex>,
    pub generator: Arc<MockGenerator>,
    pub judge: Arc<MockJudge>,
}

pub async fn build_pipeline(config: PipelineConfig) -> Pipeline {
    let embedder = Arc::new(MockEmbedder::new(EMBEDDING_DIM));
    let catalog = MemoryCatalog::builtin();
    let index = Arc::new(MockProductIndex::new());
    let points = product_points(catalog.products(), embedder.as_ref())
        .await
        .expect("catalog should embed");
    index.upsert(points).expect("mock index should accept points");

    let ranking = Arc::new(RankingEngine::new(
        embedder.clone(),
        index.clone(),
        Arc::new(catalog),
        Arc::new(MockPairScorer::new(0.0)),
        RankingConfig::default(),
    ));

    let rules = RuleIndex::build(builtin_rules(), embedder.clone())
        .await
        .expect("rules should embed");
    let generator = Arc::new(config.generator);
    let judge = Arc::new(config.judge);
    let compliance = Arc::new(ComplianceLoop::new(
        generator.clone(),
        judge.clone(),
        Arc::new(rules),
        Arc::new(FallbackCatalog::builtin()),
        ComplianceConfig::default().max_retries(config.max_retries),
    ));

    let brands = BrandScorer::new(Arc::new(PersonaCatalog::builtin()), "Laneige");
    let workflow = Arc::new(Workflow::new(brands, ranking, config.store, compliance));

    Pipeline {
        workflow,
        embedder,
        index,
        generator,
        judge,
    }
}

pub fn dry_skin_profile(customer_id: &str, name: &str) -> CustomerProfile {
    CustomerProfile::new(customer_id)
        .name(name)
        .skin_types(["dry", "sensitive"])
        .concerns(["dryness", "redness"])
        .keywords(["vegan", "보습"])
        .normalized()
}

pub fn laneige_request(customer_id: &str, name: &str) -> WorkflowRequest {
    WorkflowRequest::new(dry_skin_profile(customer_id, name))
        .channel(Channel::AppPush)
        .intent(Intent::Regular)
        .brand("Laneige")
}

pub fn message_body(customer_id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "customer": {
            "customer_id": customer_id,
            "name": name,
            "skin_type": "{dry,sensitive}",
            "skin_concerns": ["dryness", "redness"],
            "keywords": "vegan, 보습"
        },
        "channel": "app_push",
        "intent": "regular",
        "brand": "Laneige"
    })
}
