//! # Error Types
//!
//! Domain-specific error types for krishi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  krishi-core errors (this file)                                        │
//! │  ├── CoreError        - Request-level domain errors                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  krishi-cache errors (separate crate)                                  │
//! │  └── CacheError       - Redis failures (always swallowed by callers)   │
//! │                                                                         │
//! │  krishi-llm errors (separate crate)                                    │
//! │  └── LlmError         - Provider failures (converted to fallbacks)     │
//! │                                                                         │
//! │  advisor-api errors (in app)                                           │
//! │  └── ApiError         - What the client sees (JSON envelope)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP 4xx/5xx           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note what is NOT an error here: a crop that resolves in neither price
//! table. That degrades to a zero price and the pipeline carries on.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request named more crops than a single call may rank.
    #[error("Too many crops in one request: {requested} (max {max})")]
    TooManyCrops { requested: usize, max: usize },

    /// A request body could not be turned into the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any computation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required fields are missing or empty.
    #[error("Missing required field(s): {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value has the wrong JSON type.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
