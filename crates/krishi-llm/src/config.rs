//! # LLM Configuration
//!
//! Provider settings for the chat-completions client.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LLM_API_KEY set?                                                       │
//! │     ├── no  ──► generator = None  (templates / { available: false })   │
//! │     └── yes ──► ChatClient::new(LlmConfig)                              │
//! │                   url      LLM_API_URL     (OpenAI-compatible)          │
//! │                   model    LLM_MODEL       gpt-4o-mini                  │
//! │                   timeout  LLM_TIMEOUT_SECS 60                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The advisor-api config layer reads these values; this type only carries
//! them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, LlmResult};

/// OpenAI-compatible chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat completions URL.
    pub api_url: String,

    /// Bearer token. Never logged or serialized.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Model name, e.g. "gpt-4o-mini".
    pub model: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    /// Config with the default URL, model and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        LlmConfig {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects blank keys, non-HTTP URLs and a zero timeout.
    pub fn validate(&self) -> LlmResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured);
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(LlmError::InvalidConfig(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::InvalidConfig("model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::InvalidConfig("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }
}
