use std::time::Duration;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_HTTP_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Base URL of an OpenAI-compatible API (`{url}/embeddings`). `None` selects the stub.
    pub url: Option<String>,

    pub model: String,

    pub api_key: Option<String>,

    pub dimension: usize,

    pub timeout: Duration,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: crate::config::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            dimension: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl EmbedderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.url.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("dimension must be greater than zero".to_string());
        }

        if let Some(ref url) = self.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("url must be http(s), got '{url}'"));
        }

        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }

        Ok(())
    }
}
