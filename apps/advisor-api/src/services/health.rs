//! Health check.
//!
//! Redis and the text generator are both optional, so their absence degrades
//! the service but never makes it unhealthy.

use chrono::{DateTime, Utc};
use krishi_cache::CacheStatus;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingStatus {
    Healthy,
    /// Serving, but Redis is configured and not answering.
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: ServingStatus,
    pub redis: CacheStatus,
    pub llm_configured: bool,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

pub async fn check(state: &AppState) -> HealthReport {
    let redis = match (state.cache.is_enabled(), state.config.redis_url.is_some()) {
        (true, _) => state.cache.status().await,
        // Configured, but the start-up connection failed.
        (false, true) => CacheStatus::Unavailable,
        (false, false) => CacheStatus::NotConfigured,
    };

    let status = if redis == CacheStatus::Unavailable {
        ServingStatus::Degraded
    } else {
        ServingStatus::Healthy
    };

    HealthReport {
        status,
        redis,
        llm_configured: state.llm_configured(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    }
}
