//! # krishi-cache: Redis Memoization for Krishi Advisor
//!
//! This crate memoizes expensive LLM calls in Redis. Keys come from
//! `krishi_core::cache_key`; values are stored as JSON with a TTL.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Krishi Advisor Data Flow                           │
//! │                                                                         │
//! │  POST /api/insights                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cache_key("insights", params) ──► "insights:3f2a9c0d1b7e4a55"         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  krishi-cache (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   get(key) ── hit ──► return cached JSON                        │   │
//! │  │      │                                                          │   │
//! │  │     miss ──► generator ──► set(key, value, ttl)                 │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Redis (optional)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - Configuration, connection and cache operations
//! - [`error`] - Cache error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use krishi_cache::{CacheConfig, CacheService};
//!
//! let config = CacheConfig::new("redis://127.0.0.1:6379").ttl_hours(6);
//! let cache = CacheService::connect_or_disabled(Some(&config)).await;
//!
//! if let Some(hit) = cache.get::<serde_json::Value>(&key).await {
//!     return Ok(hit);
//! }
//! cache.set(&key, &fresh).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CacheError, CacheResult};
pub use service::{CacheConfig, CacheService, CacheStatus, DEFAULT_TTL_HOURS};
