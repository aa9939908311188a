pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{DEFAULT_RERANK_MODEL, RerankerConfig};
pub use error::RerankerError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPairScorer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Scores `(query, document)` pairs. Higher means more relevant; scores are unbounded.
#[async_trait]
pub trait PairScorer: Send + Sync {
    /// Returns exactly one score per document, in input order.
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError>;

    fn is_stub(&self) -> bool {
        false
    }
}

pub fn build_reranker(config: RerankerConfig) -> Result<Arc<dyn PairScorer>, RerankerError> {
    config
        .validate()
        .map_err(|reason| RerankerError::InvalidConfig { reason })?;

    if config.is_stub() {
        info!("No reranker endpoint configured, operating in lexical mode");
        return Ok(Arc::new(LexicalReranker::new()));
    }

    Ok(Arc::new(HttpReranker::new(config)?))
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    texts: &'a [String],
    raw_scores: bool,
    truncate: bool,
}

#[derive(Deserialize)]
struct RankedText {
    index: usize,
    score: f32,
}

/// Client for a text-embeddings-inference style `/rerank` endpoint.
#[derive(Clone)]
pub struct HttpReranker {
    client: reqwest::Client,
    endpoint: String,
    config: RerankerConfig,
}

impl std::fmt::Debug for HttpReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReranker")
            .field("endpoint", &self.endpoint)
            .field("model", &self.config.model)
            .finish()
    }
}

impl HttpReranker {
    pub fn new(config: RerankerConfig) -> Result<Self, RerankerError> {
        let base = config
            .url
            .as_deref()
            .ok_or_else(|| RerankerError::InvalidConfig {
                reason: "HttpReranker requires a url".to_string(),
            })?;
        let endpoint = format!("{}/rerank", base.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }
}

#[async_trait]
impl PairScorer for HttpReranker {
    #[instrument(skip(self, query, documents), fields(num_documents = documents.len()))]
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RerankRequest {
                query,
                texts: documents,
                raw_scores: true,
                truncate: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RerankerError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let ranked: Vec<RankedText> =
            response
                .json()
                .await
                .map_err(|e| RerankerError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let mut scores: Vec<Option<f32>> = vec![None; documents.len()];
        for item in ranked {
            let slot = scores
                .get_mut(item.index)
                .ok_or_else(|| RerankerError::InvalidResponse {
                    reason: format!("index {} out of range", item.index),
                })?;
            *slot = Some(item.score);
        }

        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.ok_or_else(|| RerankerError::InvalidResponse {
                    reason: format!("missing score for document {i}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            top_score = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max),
            "rerank complete"
        );
        Ok(scores)
    }
}

/// Token-overlap scorer used when no model endpoint is available.
///
/// `sigmoid(8 * (0.6 * recall + 0.4 * jaccard - 0.5))` over lowercased tokens
/// with stop words and Korean particles removed.
#[derive(Debug, Clone)]
pub struct LexicalReranker {
    stop_words: HashSet<&'static str>,
}

impl Default for LexicalReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalReranker {
    pub fn new() -> Self {
        let stop_words = [
            "a", "an", "the", "is", "are", "was", "be", "to", "of", "in", "for", "on", "with",
            "at", "by", "from", "as", "and", "or", "but", "if", "it", "its", "this", "that",
            "및", "등", "의", "을", "를", "이", "가", "은", "는", "에", "와", "과", "로", "으로",
            "없음", "정보",
        ]
        .into_iter()
        .collect();
        Self { stop_words }
    }

    fn tokens<'a>(&self, text: &'a str) -> HashSet<&'a str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !self.stop_words.contains(*w))
            .collect()
    }

    pub fn score_pair(&self, query: &str, document: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let document_lower = document.to_lowercase();
        let query_words = self.tokens(&query_lower);
        let document_words = self.tokens(&document_lower);

        if query_words.is_empty() {
            let len_ratio = (query.len().min(document.len()) as f32)
                / (query.len().max(document.len()).max(1) as f32);
            return len_ratio * 0.3;
        }

        let matches = query_words.intersection(&document_words).count();
        let recall = matches as f32 / query_words.len() as f32;

        let union = query_words.union(&document_words).count();
        let jaccard = if union > 0 {
            matches as f32 / union as f32
        } else {
            0.0
        };

        let base_score = 0.6 * recall + 0.4 * jaccard;
        1.0 / (1.0 + (-8.0 * (base_score - 0.5)).exp())
    }
}

#[async_trait]
impl PairScorer for LexicalReranker {
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        Ok(documents
            .iter()
            .map(|doc| self.score_pair(query, doc))
            .collect())
    }

    fn is_stub(&self) -> bool {
        true
    }
}
