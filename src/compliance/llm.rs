use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use std::fmt;
use std::time::Duration;
use tracing::error;

use super::{ComplianceError, ComplianceResult};

/// A chat model addressed through `genai`, bounded by a timeout.
#[derive(Clone)]
pub struct ChatModel {
    client: Client,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatModel")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatModel {
    pub fn new(client: Client, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system/user exchange and returns the first text part.
    ///
    /// Provider failures are reported through `wrap` so callers keep their
    /// own error variant.
    pub async fn complete(
        &self,
        system: String,
        user: String,
        options: &ChatOptions,
        wrap: fn(String) -> ComplianceError,
    ) -> ComplianceResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);

        let call = self.client.exec_chat(&self.model, request, Some(options));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ComplianceError::Timeout {
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| {
                error!(model = %self.model, "Provider error: {}", e);
                wrap(e.to_string())
            })?;

        response
            .first_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| wrap("provider returned no text".to_string()))
    }
}
