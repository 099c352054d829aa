//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! Clients are built per session from the user's own API key through a
//! `ClientFactory`, so handlers never hold a key-bound client in shared state.
//!
//! Sampling is fixed: temperature 0.7, top_p 1.0, 2048 output tokens.
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod models;

use models::ModelId;

pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 1.0;
pub const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is empty")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A user-supplied provider key. Never logged, never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Trims surrounding whitespace; blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Seams
// ────────────────────────────────────────────────────────────────────────────

/// A client able to run one chat completion and return the raw text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, model: ModelId, system: &str, user: &str)
        -> Result<String, LlmError>;
}

/// Builds key-bound clients. Carried in `AppState` as `Arc<dyn ClientFactory>`.
pub trait ClientFactory: Send + Sync {
    fn create(&self, api_key: &ApiKey) -> Result<Arc<dyn ChatCompletion>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl<'a> ChatRequest<'a> {
    fn new(model: ModelId, system: &'a str, user: &'a str) -> Self {
        Self {
            model: model.id(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        }
    }
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
    }
}

/// Pulls the human-readable message out of a provider error body, falling back
/// to the raw body.
fn provider_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Groq client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions client bound to one API key.
pub struct LlmClient {
    client: Client,
    api_key: ApiKey,
    url: String,
}

impl LlmClient {
    pub fn new(api_key: ApiKey, url: &str, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    /// Single attempt; failures surface immediately so the user can re-trigger.
    async fn complete(
        &self,
        model: ModelId,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest::new(model, system, user);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_message(body),
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                model.id(),
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        chat.into_text().ok_or(LlmError::EmptyContent)
    }
}

/// Production factory: one `LlmClient` per call to `create`.
pub struct GroqClientFactory {
    url: String,
    timeout: Option<Duration>,
}

impl GroqClientFactory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.llm_api_url.clone(),
            timeout: config.llm_timeout,
        }
    }
}

impl ClientFactory for GroqClientFactory {
    fn create(&self, api_key: &ApiKey) -> Result<Arc<dyn ChatCompletion>, LlmError> {
        if api_key.expose().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let client = LlmClient::new(api_key.clone(), &self.url, self.timeout)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_fixed_sampling() {
        let request = ChatRequest::new(ModelId::Gemma2, "sys", "usr");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemma2-9b-it");
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["top_p"], 1.0);
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_api_key_is_trimmed_and_redacted() {
        let key = ApiKey::new("  gsk_secret \n").unwrap();
        assert_eq!(key.expose(), "gsk_secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_factory_builds_client_for_valid_key() {
        let factory = GroqClientFactory::from_config(&Config::default());
        let key = ApiKey::new("gsk_test").unwrap();
        assert!(factory.create(&key).is_ok());
    }

    #[test]
    fn test_response_text_uses_first_choice() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_blank_response_is_empty_content() {
        let body = r#"{"choices": [{"message": {"content": "  "}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_provider_message_extraction() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        assert_eq!(provider_message(body.to_string()), "Invalid API Key");
        assert_eq!(provider_message("bad gateway".to_string()), "bad gateway");
    }
}
