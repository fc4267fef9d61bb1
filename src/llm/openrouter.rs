//! OpenRouter Chat-Completion Client
//!
//! Implements the `ChatClient` trait against the OpenRouter API
//! (OpenAI-compatible `/chat/completions`). One attempt per call with a
//! 60-second timeout; an error status from the API is logged and turned
//! into a fixed user-safe reply rather than a fault.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatClient, LLMError, Message, Result};

/// Production API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Reply sent to the user when the API answers with an error status
pub const API_ERROR_REPLY: &str = "Sorry, there was a problem connecting to the AI.";

/// Upper bound on a single upstream call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Attribution headers required by OpenRouter
const REFERER: &str = "https://github.com/parrot-bot/parrot";
const APP_TITLE: &str = "Parrot Telegram Bot";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// OpenRouter chat-completion client
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenRouterClient {
    /// Create a new client against the production API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(OPENROUTER_BASE_URL, api_key, model)
    }

    /// Create a new client against a specific base URL (used by tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let payload = ChatRequest {
            model: &self.model,
            messages,
        };

        tracing::debug!(
            "OpenRouter request: model={}, messages={}",
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout
                } else {
                    LLMError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter API error {}: {}", status, body);
            return Ok(API_ERROR_REPLY.to_string());
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let content = data
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

        Ok(content)
    }
}
