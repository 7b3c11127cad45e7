//! External text-generation provider.
//!
//! One attempt per request, no retries; a failed provider call fails the
//! whole request. A hung call blocks only the issuing request under the
//! per-request concurrency model.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected our credentials. Surfaced to clients only as
    /// a generic "key invalid" message.
    #[error("provider rejected credentials")]
    AuthFailed,
    #[error("provider request failed: {0}")]
    RequestFailed(String),
    #[error("provider response unparsable: {0}")]
    ParseError(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
    /// Model identifier reported back to clients.
    fn model(&self) -> &str;
}

/// Generator speaking the OpenAI-compatible chat-completions protocol.
pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatibleGenerator {
    pub fn from_config(config: &InsightConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user", content: prompt.to_string() }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::AuthFailed);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| ProviderError::ParseError(e.to_string()))?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::ParseError("no content in response".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
