//! Hybrid candidate ranking.
//!
//! A request flows through:
//! 1. query text from the profile ([`build_query`])
//! 2. embedding and coarse retrieval, filtered to the brand set
//! 3. catalog fetch for the pool
//! 4. pairwise re-ranking of `(query, content)`
//! 5. `final_score = rerank_score + alpha * keyword_bonus`
//! 6. intent ordering, then top-K
//!
//! Any upstream failure ends the request; a partially scored list is never returned.

pub mod error;
pub mod keyword;
pub mod order;
pub mod query;


pub use error::{RankingError, RankingResult};
pub use keyword::KeywordSet;
pub use order::{order_for_intent, promote_discounts, sort_by_final_score};
pub use query::{build_query, truncate_chars};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{Catalog, ProductCandidate};
use crate::config::Config;
use crate::constants::{
    DEFAULT_CANDIDATE_POOL, DEFAULT_KEYWORD_ALPHA, DEFAULT_MAX_RERANK_CHARS, DEFAULT_TOP_K,
};
use crate::embedding::{Embedder, PairScorer};
use crate::intent::Intent;
use crate::profile::{CustomerProfile, Season};
use crate::vectordb::ProductIndex;

/// A candidate with its fused scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: ProductCandidate,
    pub rerank_score: f32,
    /// In `[0, 1]`.
    pub keyword_bonus: f32,
    pub final_score: f32,
}

impl ScoredCandidate {
    pub fn new(candidate: ProductCandidate, rerank_score: f32, keyword_bonus: f32, alpha: f32) -> Self {
        Self {
            candidate,
            rerank_score,
            keyword_bonus,
            final_score: rerank_score + alpha * keyword_bonus,
        }
    }

    pub fn similarity(&self) -> f32 {
        self.candidate.similarity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    /// Coarse retrieval pool size.
    pub candidate_pool: u64,
    pub top_k: usize,
    /// Keyword bonus weight.
    pub keyword_alpha: f32,
    /// Character budget for each side of a re-rank pair.
    pub max_rerank_chars: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            top_k: DEFAULT_TOP_K,
            keyword_alpha: DEFAULT_KEYWORD_ALPHA,
            max_rerank_chars: DEFAULT_MAX_RERANK_CHARS,
        }
    }
}

impl RankingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            candidate_pool: config.candidate_pool,
            top_k: config.top_k,
            keyword_alpha: config.keyword_alpha,
            max_rerank_chars: config.max_rerank_chars,
        }
    }

    pub fn candidate_pool(mut self, pool: u64) -> Self {
        self.candidate_pool = pool;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn keyword_alpha(mut self, alpha: f32) -> Self {
        self.keyword_alpha = alpha;
        self
    }

    pub fn max_rerank_chars(mut self, chars: usize) -> Self {
        self.max_rerank_chars = chars;
        self
    }
}

/// One ranking request.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub profile: CustomerProfile,
    /// Empty means unfiltered.
    pub brands: Vec<String>,
    pub intent: Intent,
    /// Falls back to [`RankingConfig::top_k`].
    pub top_k: Option<usize>,
    /// Consulted only under weather intent.
    pub season: Season,
}

impl RankingRequest {
    pub fn new(profile: CustomerProfile) -> Self {
        Self {
            profile,
            brands: Vec::new(),
            intent: Intent::default(),
            top_k: None,
            season: Season::current(),
        }
    }

    pub fn brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    pub fn intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }
}

/// Fuses coarse retrieval, re-ranking and keyword overlap.
#[derive(Clone)]
pub struct RankingEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn ProductIndex>,
    catalog: Arc<dyn Catalog>,
    scorer: Arc<dyn PairScorer>,
    config: RankingConfig,
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("embedder_dim", &self.embedder.dimension())
            .field("catalog_len", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RankingEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn ProductIndex>,
        catalog: Arc<dyn Catalog>,
        scorer: Arc<dyn PairScorer>,
        config: RankingConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            catalog,
            scorer,
            config,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub async fn is_ready(&self) -> bool {
        self.index.is_ready().await
    }

    #[instrument(skip(self, request), fields(intent = %request.intent, brands = request.brands.len()))]
    pub async fn rank(&self, request: &RankingRequest) -> RankingResult<Vec<ScoredCandidate>> {
        let top_k = request.top_k.unwrap_or(self.config.top_k);
        if top_k == 0 {
            return Err(RankingError::InvalidRequest {
                reason: "top_k must be greater than zero".to_string(),
            });
        }

        let query = build_query(&request.profile);

        let vector = self
            .embedder
            .embed(&query)
            .await
            .map_err(|e| RankingError::RetrievalUnavailable {
                stage: "embedding",
                message: e.to_string(),
            })?;

        let hits = self
            .index
            .search(vector, self.config.candidate_pool, &request.brands)
            .await
            .map_err(|e| RankingError::RetrievalUnavailable {
                stage: "search",
                message: e.to_string(),
            })?;

        if hits.is_empty() {
            return Err(self.empty_pool(&request.brands));
        }
        debug!(pool = hits.len(), "coarse retrieval complete");

        let ids: Vec<String> = hits.iter().map(|h| h.product_id.clone()).collect();
        let similarity: HashMap<&str, f32> = hits
            .iter()
            .map(|h| (h.product_id.as_str(), h.similarity))
            .collect();

        let products = self
            .catalog
            .fetch(&ids)
            .await
            .map_err(|e| RankingError::RetrievalUnavailable {
                stage: "catalog",
                message: e.to_string(),
            })?;

        if products.is_empty() {
            warn!(pool = ids.len(), "no retrieved product is present in the catalog");
            return Err(self.empty_pool(&request.brands));
        }

        let candidates: Vec<ProductCandidate> = products
            .into_iter()
            .filter(|p| !p.content.trim().is_empty())
            .map(|p| {
                let sim = similarity.get(p.id.as_str()).copied().unwrap_or(0.0);
                ProductCandidate::new(p, sim)
            })
            .collect();

        if candidates.is_empty() {
            return Err(RankingError::RerankUnavailable {
                message: "no retrieved product has content".to_string(),
            });
        }

        let max_chars = self.config.max_rerank_chars;
        let documents: Vec<String> = candidates
            .iter()
            .map(|c| truncate_chars(&c.product.content, max_chars).to_string())
            .collect();

        let scores = self
            .scorer
            .score(truncate_chars(&query, max_chars), &documents)
            .await
            .map_err(|e| RankingError::RerankUnavailable {
                message: e.to_string(),
            })?;

        if scores.len() != candidates.len() {
            return Err(RankingError::RerankUnavailable {
                message: format!(
                    "expected {} scores, got {}",
                    candidates.len(),
                    scores.len()
                ),
            });
        }

        let keywords = KeywordSet::for_request(&request.profile, request.intent, request.season);
        let alpha = self.config.keyword_alpha;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, rerank)| {
                let bonus = keywords.bonus(&candidate.product.content, &candidate.product.keywords);
                ScoredCandidate::new(candidate, rerank, bonus, alpha)
            })
            .collect();

        order_for_intent(&mut scored, request.intent);
        scored.truncate(top_k);

        if let Some(best) = scored.first() {
            info!(
                product = %best.candidate.id(),
                brand = %best.candidate.brand(),
                rerank = best.rerank_score,
                keyword_bonus = best.keyword_bonus,
                final_score = best.final_score,
                "ranking complete"
            );
        }

        Ok(scored)
    }

    fn empty_pool(&self, brands: &[String]) -> RankingError {
        if brands.is_empty() {
            RankingError::NoCandidates
        } else {
            RankingError::NoCandidatesForBrandFilter {
                brands: brands.to_vec(),
            }
        }
    }
}
