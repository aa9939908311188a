//! Thin typed client over the gateway routes.

use petal::constants::PETAL_STATUS_HEADER;
use petal::gateway::error::ErrorResponse;
use petal::gateway::payload::{MessageResponseBody, RecommendationResponseBody};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyComponents {
    pub http: String,
    pub vectordb: String,
    pub cache: String,
    pub embedder_mode: String,
    pub provider_mode: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyBody {
    pub status: String,
    pub components: ReadyComponents,
}

impl ReadyBody {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn health(&self) -> anyhow::Result<HealthBody> {
        let res = self
            .client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?;
        Ok(res.json().await?)
    }

    pub async fn ready(&self) -> anyhow::Result<ReadyBody> {
        let res = self
            .client
            .get(format!("{}/ready", self.base_url))
            .send()
            .await?;
        Ok(res.json().await?)
    }

    /// Posts a message request; returns the body and the status header.
    pub async fn message(
        &self,
        body: &serde_json::Value,
    ) -> anyhow::Result<(MessageResponseBody, String)> {
        let res = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = res
            .headers()
            .get(PETAL_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !res.status().is_success() {
            let err: ErrorResponse = res.json().await?;
            anyhow::bail!("request failed ({}): {}", err.code, err.error);
        }
        Ok((res.json().await?, status))
    }

    /// Raw status code and error body for requests expected to fail.
    pub async fn message_error(
        &self,
        body: &serde_json::Value,
    ) -> anyhow::Result<(u16, ErrorResponse)> {
        let res = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .json(body)
            .send()
            .await?;
        let code = res.status().as_u16();
        Ok((code, res.json().await?))
    }

    pub async fn recommendations(
        &self,
        body: &serde_json::Value,
    ) -> anyhow::Result<RecommendationResponseBody> {
        let res = self
            .client
            .post(format!("{}/v1/recommendations", self.base_url))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}
