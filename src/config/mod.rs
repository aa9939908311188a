//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PETAL_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BRAND, DEFAULT_CANDIDATE_POOL, DEFAULT_COLLECTION_NAME, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_KEYWORD_ALPHA, DEFAULT_MAX_RERANK_CHARS, DEFAULT_MAX_RETRIES, DEFAULT_TOP_K,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PETAL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Product collection in Qdrant. Default: `products`.
    pub collection: String,

    /// OpenAI-compatible embeddings endpoint. `None` runs the stub embedder.
    pub embedding_url: Option<String>,

    pub embedding_model: String,

    pub embedding_api_key: Option<String>,

    /// Pairwise re-rank endpoint. `None` runs the lexical scorer.
    pub reranker_url: Option<String>,

    /// Model used to draft messages.
    pub generation_model: String,

    /// Model used to judge drafts.
    pub judge_model: String,

    pub max_retries: u32,

    pub candidate_pool: u64,

    pub top_k: usize,

    pub keyword_alpha: f32,

    pub max_rerank_chars: usize,

    /// Directory for the file-backed message cache. `None` keeps it in memory.
    pub cache_path: Option<PathBuf>,

    /// Entries in the in-memory front cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// JSON product catalog. `None` uses the built-in sample catalog.
    pub catalog_path: Option<PathBuf>,

    pub personas_path: Option<PathBuf>,

    pub rules_path: Option<PathBuf>,

    pub fallbacks_path: Option<PathBuf>,

    /// Brand used when neither persona nor interaction data is available.
    pub default_brand: String,

    pub http_timeout_secs: u64,

    /// Answer generation and judgment from in-process stand-ins.
    pub mock_provider: bool,
}

/// Default Qdrant URL used when `PETAL_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            reranker_url: None,
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            judge_model: DEFAULT_GENERATION_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            top_k: DEFAULT_TOP_K,
            keyword_alpha: DEFAULT_KEYWORD_ALPHA,
            max_rerank_chars: DEFAULT_MAX_RERANK_CHARS,
            cache_path: None,
            cache_capacity: 10_000,
            catalog_path: None,
            personas_path: None,
            rules_path: None,
            fallbacks_path: None,
            default_brand: DEFAULT_BRAND.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PETAL_PORT";
    const ENV_BIND_ADDR: &'static str = "PETAL_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "PETAL_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "PETAL_COLLECTION";
    const ENV_EMBEDDING_URL: &'static str = "PETAL_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "PETAL_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "PETAL_EMBEDDING_API_KEY";
    const ENV_RERANKER_URL: &'static str = "PETAL_RERANKER_URL";
    const ENV_GENERATION_MODEL: &'static str = "PETAL_GENERATION_MODEL";
    const ENV_JUDGE_MODEL: &'static str = "PETAL_JUDGE_MODEL";
    const ENV_MAX_RETRIES: &'static str = "PETAL_MAX_RETRIES";
    const ENV_CANDIDATE_POOL: &'static str = "PETAL_CANDIDATE_POOL";
    const ENV_TOP_K: &'static str = "PETAL_TOP_K";
    const ENV_KEYWORD_ALPHA: &'static str = "PETAL_KEYWORD_ALPHA";
    const ENV_MAX_RERANK_CHARS: &'static str = "PETAL_MAX_RERANK_CHARS";
    const ENV_CACHE_PATH: &'static str = "PETAL_CACHE_PATH";
    const ENV_CACHE_CAPACITY: &'static str = "PETAL_CACHE_CAPACITY";
    const ENV_CATALOG_PATH: &'static str = "PETAL_CATALOG_PATH";
    const ENV_PERSONAS_PATH: &'static str = "PETAL_PERSONAS_PATH";
    const ENV_RULES_PATH: &'static str = "PETAL_RULES_PATH";
    const ENV_FALLBACKS_PATH: &'static str = "PETAL_FALLBACKS_PATH";
    const ENV_DEFAULT_BRAND: &'static str = "PETAL_DEFAULT_BRAND";
    const ENV_HTTP_TIMEOUT_SECS: &'static str = "PETAL_HTTP_TIMEOUT_SECS";
    const ENV_MOCK_PROVIDER: &'static str = "PETAL_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY);
        let reranker_url = Self::parse_optional_string_from_env(Self::ENV_RERANKER_URL);
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, defaults.generation_model);
        let judge_model = Self::parse_string_from_env(Self::ENV_JUDGE_MODEL, defaults.judge_model);
        let max_retries =
            Self::parse_number_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries)?;
        let candidate_pool =
            Self::parse_number_from_env(Self::ENV_CANDIDATE_POOL, defaults.candidate_pool)?;
        let top_k = Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let keyword_alpha =
            Self::parse_number_from_env(Self::ENV_KEYWORD_ALPHA, defaults.keyword_alpha)?;
        let max_rerank_chars =
            Self::parse_number_from_env(Self::ENV_MAX_RERANK_CHARS, defaults.max_rerank_chars)?;
        let cache_path = Self::parse_optional_path_from_env(Self::ENV_CACHE_PATH);
        let cache_capacity =
            Self::parse_number_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let catalog_path = Self::parse_optional_path_from_env(Self::ENV_CATALOG_PATH);
        let personas_path = Self::parse_optional_path_from_env(Self::ENV_PERSONAS_PATH);
        let rules_path = Self::parse_optional_path_from_env(Self::ENV_RULES_PATH);
        let fallbacks_path = Self::parse_optional_path_from_env(Self::ENV_FALLBACKS_PATH);
        let default_brand =
            Self::parse_string_from_env(Self::ENV_DEFAULT_BRAND, defaults.default_brand);
        let http_timeout_secs =
            Self::parse_number_from_env(Self::ENV_HTTP_TIMEOUT_SECS, defaults.http_timeout_secs)?;
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            embedding_url,
            embedding_model,
            embedding_api_key,
            reranker_url,
            generation_model,
            judge_model,
            max_retries,
            candidate_pool,
            top_k,
            keyword_alpha,
            max_rerank_chars,
            cache_path,
            cache_capacity,
            catalog_path,
            personas_path,
            rules_path,
            fallbacks_path,
            default_brand,
            http_timeout_secs,
            mock_provider,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.cache_path
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: path.clone() });
        }

        for path in [
            &self.catalog_path,
            &self.personas_path,
            &self.rules_path,
            &self.fallbacks_path,
        ]
        .into_iter()
        .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.candidate_pool == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_CANDIDATE_POOL,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_TOP_K,
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.keyword_alpha.is_finite() || self.keyword_alpha < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_KEYWORD_ALPHA,
                reason: format!("must be a non-negative number, got {}", self.keyword_alpha),
            });
        }

        if self.max_rerank_chars == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_MAX_RERANK_CHARS,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidNumber {
                    name,
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }
}
