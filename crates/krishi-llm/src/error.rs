//! # LLM Error Types
//!
//! Error types for text-generation calls.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       LLM Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotConfigured  │  │  Request        │  │  Status (4xx / 5xx)     │ │
//! │  │  InvalidConfig  │  │  Timeout        │  │  EmptyResponse          │ │
//! │  │                 │  │                 │  │  InvalidResponse        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers never surface these to the client. Every variant ends in a static
//! fallback or an `{ available: false }` envelope.

use thiserror::Error;

/// Result type alias for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// No API key configured; the provider is disabled.
    #[error("Text generation is not configured")]
    NotConfigured,

    /// Configuration is present but unusable.
    #[error("Invalid LLM configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The HTTP request could not be completed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The provider did not answer within the timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The provider answered with a non-success status (rate limit, auth, ...).
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered without any generated text.
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// The response body was not the expected JSON.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Timeouts, transport failures, rate limits and 5xx answers. Everything
    /// else points at configuration.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout(_) | LlmError::Request(_) => true,
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(err.to_string())
    }
}
