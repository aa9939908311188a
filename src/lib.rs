//! Petal library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Request pipeline
//! - [`Workflow`], [`WorkflowRequest`], [`WorkflowOutcome`] - Per-request controller
//! - [`RankingEngine`], [`RankingRequest`], [`ScoredCandidate`] - Hybrid product ranking
//! - [`ComplianceLoop`], [`GenerationOutcome`] - Bounded-retry message generation
//!
//! ## Collaborators
//! - [`Embedder`], [`PairScorer`] - Embeddings and pairwise re-ranking
//! - [`ProductIndex`], [`QdrantProductIndex`] - Coarse retrieval
//! - [`Catalog`], [`MemoryCatalog`] - Product details
//! - [`MessageStore`] - Content-addressed message cache
//! - [`MessageGenerator`], [`Judge`] - Drafting and compliance judgment
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod catalog;
pub mod channel;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod intent;
pub mod persona;
pub mod profile;
pub mod ranking;
pub mod vectordb;
pub mod workflow;

pub use cache::{
    CacheEntry, CacheError, CachedMessageStore, FileMessageStore, MemoryMessageStore,
    MessageStore, build_message_store,
};
pub use catalog::{Catalog, CatalogError, MemoryCatalog, Product, ProductCandidate};
pub use channel::{Channel, ChannelConstraints};
pub use compliance::{
    ComplianceConfig, ComplianceError, ComplianceLoop, ComplianceRule, ComplianceVerdict,
    FallbackCatalog, GenerationOutcome, GenerationRequest, Judge, LexicalJudge, LlmJudge,
    LlmMessageGenerator, MessageGenerator, RuleIndex, TemplateGenerator, Violation,
};
pub use config::{Config, ConfigError};
pub use embedding::{Embedder, EmbeddingError, PairScorer, RerankerError, StubEmbedder};
pub use hashing::{Signature, SignatureInput, hash_parts_to_u64, signature};
pub use intent::Intent;
pub use persona::{BrandGuideline, BrandResolution, BrandScorer, Persona, PersonaCatalog};
pub use profile::{CustomerProfile, RawProfile, Season};
pub use ranking::{RankingConfig, RankingEngine, RankingError, RankingRequest, ScoredCandidate};
pub use vectordb::{ProductIndex, QdrantProductIndex, VectorDbError};
pub use workflow::{Workflow, WorkflowError, WorkflowOutcome, WorkflowRequest, personalize};

#[cfg(any(test, feature = "mock"))]
pub use cache::MockMessageStore;
#[cfg(any(test, feature = "mock"))]
pub use compliance::{MockGenerator, MockJudge};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbedder, MockPairScorer};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockProductIndex;
