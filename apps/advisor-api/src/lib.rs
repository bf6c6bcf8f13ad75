//! # Krishi Advisor API
//!
//! HTTP server for crop recommendations, profitability, and generated
//! guidance.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Advisor API                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  handlers      │  │  services      │  │  krishi-core               ││
//! │  │                │  │                │  │                            ││
//! │  │ • validate     │─►│ • insights     │─►│ • recommend / top_n        ││
//! │  │ • recommend    │  │ • operational  │  │ • prompts, parsing         ││
//! │  │ • respond      │  │ • natural farm │  │ • coercion, templates      ││
//! │  └────────────────┘  └───────┬────────┘  └────────────────────────────┘│
//! │                              │                                          │
//! │  ┌───────────────────────────┴──────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────────────┐        ┌──────────────────────────────┐│  │
//! │  │  │  Redis (optional)    │        │  LLM provider (optional)     ││  │
//! │  │  │  krishi-cache        │        │  krishi-llm, Semaphore-gated ││  │
//! │  │  └──────────────────────┘        └──────────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `krishi.toml`):
//! - `PORT` - HTTP port (default: 5000)
//! - `BIND_ADDR` - bind address (default: 0.0.0.0)
//! - `REDIS_URL` - Redis connection string; caching is off without it
//! - `CACHE_TTL_HOURS` - TTL for cached generations (default: 6)
//! - `LLM_API_URL`, `LLM_API_KEY`, `LLM_MODEL`, `LLM_TIMEOUT_SECS`
//! - `LLM_MAX_CONCURRENCY` - concurrent provider calls (default: 4)
//! - `DEFAULT_TOP_N` - recommendations when topN is omitted (default: 5)

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::{AdvisorConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the router with every endpoint and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/prices/{crop}", get(handlers::prices::prices))
        .route("/api/recommendations", post(handlers::recommendations::recommendations))
        .route(
            "/api/recommendations/crop",
            post(handlers::recommendations::crop_recommendation),
        )
        .route("/api/profitability", post(handlers::profitability::profitability))
        .route("/api/insights", post(handlers::generation::insights))
        .route(
            "/api/operational-details",
            post(handlers::generation::operational_details),
        )
        .route("/api/natural-farming", post(handlers::generation::natural_farming))
        .route("/api/cache/{prefix}", delete(handlers::cache::invalidate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
