//! # Cache Error Types
//!
//! Error types for Redis operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Redis Error (redis::RedisError) / serde_json::Error                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheService public API ← Logged with warn!, then swallowed           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller sees a miss (None) or `false`                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only [`CacheService::connect`](crate::CacheService::connect) returns a
//! `CacheError` to its caller; start-up decides whether to run without a
//! cache.

use thiserror::Error;

/// Cache operation errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configured URL is not a valid Redis URL.
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(String),

    /// Connection could not be established.
    ///
    /// ## When This Occurs
    /// - Redis is not running or unreachable
    /// - Authentication failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection attempt exceeded the configured timeout.
    #[error("Connection timed out after {0} seconds")]
    Timeout(u64),

    /// A command failed after the connection was established.
    #[error("Redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    /// A value could not be encoded or a stored value could not be decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caching is disabled (no Redis URL configured).
    #[error("Cache is disabled")]
    Disabled,
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CacheError::Timeout(5).to_string(), "Connection timed out after 5 seconds");
        assert_eq!(CacheError::Disabled.to_string(), "Cache is disabled");
    }

    #[test]
    fn test_serde_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let cache_err: CacheError = err.into();
        assert!(matches!(cache_err, CacheError::Serialization(_)));
    }
}
