use std::time::Duration;

use crate::constants::DEFAULT_HTTP_TIMEOUT_SECS;

/// Re-rank model served behind the endpoint.
pub const DEFAULT_RERANK_MODEL: &str = "BAAI/bge-reranker-v2-m3";

#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Base URL of a `/rerank` endpoint. `None` selects the lexical scorer.
    pub url: Option<String>,

    pub model: String,

    pub timeout: Duration,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: DEFAULT_RERANK_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl RerankerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.url.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.url
            && url.trim().is_empty()
        {
            return Err("url cannot be empty when provided".to_string());
        }

        Ok(())
    }
}
