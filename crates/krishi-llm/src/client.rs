//! # Chat Client
//!
//! The [`TextGenerator`] seam and its OpenAI-compatible implementation.
//!
//! ## Request / Response
//! ```text
//! Prompt { system, user, temperature, max_tokens }
//!    │
//!    ▼  POST {api_url}   Authorization: Bearer {api_key}
//! {
//!   "model": "gpt-4o-mini",
//!   "messages": [ { "role": "system", ... }, { "role": "user", ... } ],
//!   "temperature": 0.5,
//!   "max_tokens": 1200
//! }
//!    │
//!    ▼
//! choices[0].message.content  ──►  String
//! ```
//!
//! No retries. A failed call is reported once and the caller falls back.

use async_trait::async_trait;
use krishi_core::prompt::Prompt;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> LlmResult<String>;
}

/// Chat-completions request body for `prompt`.
pub fn chat_request_body(model: &str, prompt: &Prompt) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": prompt.system },
            { "role": "user", "content": prompt.user }
        ],
        "temperature": prompt.temperature,
        "max_tokens": prompt.max_tokens
    })
}

/// Generated text from a chat-completions response body.
pub fn extract_content(body: &Value) -> LlmResult<String> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(content.to_string())
}

/// Client for an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::InvalidConfig(e.to_string()))?;

        Ok(ChatClient { config, http })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn map_reqwest(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn generate(&self, prompt: &Prompt) -> LlmResult<String> {
        let body = chat_request_body(&self.config.model, prompt);
        debug!(
            model = %self.config.model,
            prompt_chars = prompt.user.len(),
            max_tokens = prompt.max_tokens,
            "Sending generation request"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let json: Value = response.json().await.map_err(|e| self.map_reqwest(e))?;
        let content = extract_content(&json)?;
        debug!(response_chars = content.len(), "Generation complete");
        Ok(content)
    }
}
