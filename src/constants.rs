//! Cross-cutting, shared constants.
//!
//! Component configs default to these values; `Config` can override most of them.

/// Output dimension of the query/product embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Coarse retrieval pool size.
pub const DEFAULT_CANDIDATE_POOL: u64 = 200;

/// Candidates returned by a ranking request when the caller does not say.
pub const DEFAULT_TOP_K: usize = 1;

/// Weight of the keyword bonus in `final_score`.
pub const DEFAULT_KEYWORD_ALPHA: f32 = 1.2;

/// Character budget for each side of a re-rank pair.
pub const DEFAULT_MAX_RERANK_CHARS: usize = 1800;

/// Promotional intent re-sorts this many leading candidates by discount.
pub const PROMOTIONAL_WINDOW: usize = 5;

pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Semantic rule matches added on top of lexical hits.
pub const DEFAULT_SEMANTIC_RULES: usize = 5;

/// Score granted to brands the persona recommends.
pub const PERSONA_BRAND_WEIGHT: u32 = 3;

pub const DEFAULT_BRAND: &str = "Laneige";

pub const DEFAULT_COLLECTION_NAME: &str = "products";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Name substituted for the placeholder when the profile has none.
pub const DEFAULT_CUSTOMER_NAME: &str = "고객";

pub const PETAL_STATUS_HEADER: &str = "X-Petal-Status";
pub const PETAL_STATUS_HIT: &str = "hit";
pub const PETAL_STATUS_GENERATED: &str = "generated";
pub const PETAL_STATUS_FALLBACK: &str = "fallback";
pub const PETAL_STATUS_ERROR: &str = "error";
pub const PETAL_STATUS_HEALTHY: &str = "healthy";
pub const PETAL_STATUS_READY: &str = "ready";
