//! Text embedding and pairwise re-ranking.
//!
//! - [`Embedder`] turns query text into a fixed-size vector.
//! - [`reranker`] scores `(query, document)` pairs for the ranking engine.
//!
//! Both have an HTTP implementation and a deterministic in-process one that
//! runs without any model endpoint.

pub mod config;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod reranker;
pub mod stub;


pub use config::EmbedderConfig;
pub use error::{EmbeddingError, EmbeddingResult};
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use reranker::MockPairScorer;
pub use reranker::{HttpReranker, LexicalReranker, PairScorer, RerankerConfig, RerankerError};
pub use stub::StubEmbedder;

use async_trait::async_trait;
use std::sync::Arc;

/// Produces embeddings for query and rule text.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Output dimensionality. Every vector returned by [`Embedder::embed`] has this length.
    fn dimension(&self) -> usize;

    /// `true` when no model endpoint is behind this embedder.
    fn is_stub(&self) -> bool {
        false
    }
}

/// Builds the HTTP embedder when a URL is configured, the stub otherwise.
pub fn build_embedder(config: EmbedderConfig) -> EmbeddingResult<Arc<dyn Embedder>> {
    config
        .validate()
        .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

    if config.is_stub() {
        tracing::warn!("No embedding endpoint configured, running embedder in stub mode");
        return Ok(Arc::new(StubEmbedder::new(config.dimension)));
    }

    Ok(Arc::new(HttpEmbedder::new(config)?))
}

/// Cosine similarity; `0.0` for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
