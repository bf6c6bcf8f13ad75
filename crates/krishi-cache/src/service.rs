//! # Cache Service
//!
//! JSON get/set with TTL, delete and exists on top of a Redis
//! `ConnectionManager`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cache Service                                      │
//! │                                                                         │
//! │  advisor-api start-up                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheConfig::new(url).ttl_hours(6)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheService::connect(config).await ──── error ──► disabled()         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │   ConnectionManager (multiplexed)        │                           │
//! │  │   cheap to clone, reconnects itself      │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ shared by every request handler                                 │
//! │       ▼                                                                 │
//! │  get / set / delete / exists                                           │
//! │  (store errors logged and swallowed)                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## In-Memory Store
//! [`CacheService::in_memory`] keeps entries in a process-local map instead
//! of Redis. It ignores the TTL and is meant for tests and single-process
//! development, the same way `:memory:` databases are.
//!
//! ## Best-Effort Memoization
//! There is no locking. Two identical requests that both miss will both call
//! the generator and both write the key; the second write wins. Entries are
//! independent so no multi-key transaction is ever needed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CacheError, CacheResult};

// =============================================================================
// Configuration
// =============================================================================

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL_HOURS: u64 = 6;

/// Cache configuration.
///
/// ## Example
/// ```rust
/// use krishi_cache::CacheConfig;
///
/// let config = CacheConfig::new("redis://127.0.0.1:6379").ttl_hours(12);
/// assert_eq!(config.ttl_secs(), 12 * 3600);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis URL, e.g. `redis://127.0.0.1:6379/0`.
    pub url: String,

    /// Entry time-to-live in hours.
    /// Default: 6
    pub ttl_hours: u64,

    /// Timeout for the initial connection.
    /// Default: 5 seconds
    pub connect_timeout: Duration,
}

impl CacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        CacheConfig {
            url: url.into(),
            ttl_hours: DEFAULT_TTL_HOURS,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the entry TTL in hours.
    pub fn ttl_hours(mut self, hours: u64) -> Self {
        self.ttl_hours = hours;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// TTL in seconds, as Redis expects it.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_hours.saturating_mul(3600)
    }
}

// =============================================================================
// Status
// =============================================================================

/// Cache health as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Connected,
    /// Process-local store, no Redis involved.
    InMemory,
    Unavailable,
    NotConfigured,
}

// =============================================================================
// Cache Service
// =============================================================================

#[derive(Clone)]
enum Backend {
    Disabled,
    Redis(ConnectionManager),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

/// Shared cache handle. Cloning is cheap.
///
/// Every operation is safe to call when caching is disabled: reads miss and
/// writes report `false`.
#[derive(Clone)]
pub struct CacheService {
    backend: Backend,
    ttl_secs: u64,
}

impl fmt::Debug for CacheService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.backend {
            Backend::Disabled => "disabled",
            Backend::Redis(_) => "redis",
            Backend::Memory(_) => "memory",
        };
        f.debug_struct("CacheService")
            .field("backend", &backend)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl CacheService {
    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        CacheService {
            backend: Backend::Disabled,
            ttl_secs: DEFAULT_TTL_HOURS * 3600,
        }
    }

    /// A process-local cache. Entries never expire.
    pub fn in_memory() -> Self {
        CacheService {
            backend: Backend::Memory(Arc::new(Mutex::new(HashMap::new()))),
            ttl_secs: DEFAULT_TTL_HOURS * 3600,
        }
    }

    /// Connects to Redis.
    ///
    /// ## Errors
    /// - `InvalidUrl` when the URL cannot be parsed
    /// - `Timeout` when the server does not answer within the timeout
    /// - `ConnectionFailed` for any other connection error
    pub async fn connect(config: &CacheConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| CacheError::InvalidUrl(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout.as_secs()))?
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;

        info!(ttl_hours = config.ttl_hours, "Connected to Redis");

        Ok(CacheService {
            backend: Backend::Redis(conn),
            ttl_secs: config.ttl_secs(),
        })
    }

    /// Connects when a config is given, falling back to a disabled cache on
    /// any failure.
    pub async fn connect_or_disabled(config: Option<&CacheConfig>) -> Self {
        let Some(config) = config else {
            info!("REDIS_URL not set, caching disabled");
            return CacheService::disabled();
        };

        match CacheService::connect(config).await {
            Ok(service) => service,
            Err(e) => {
                warn!(error = %e, "Failed to connect to Redis, continuing without cache");
                CacheService::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, Backend::Disabled)
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // -------------------------------------------------------------------------
    // Fallible operations
    // -------------------------------------------------------------------------

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let raw: Option<String> = match &self.backend {
            Backend::Disabled => return Err(CacheError::Disabled),
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                conn.get(key).await?
            }
            Backend::Memory(store) => store.lock().await.get(key).cloned(),
        };
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        let json = serde_json::to_string(value)?;
        match &self.backend {
            Backend::Disabled => return Err(CacheError::Disabled),
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                let _: () = conn.set_ex(key, json, self.ttl_secs).await?;
            }
            Backend::Memory(store) => {
                store.lock().await.insert(key.to_string(), json);
            }
        }
        Ok(())
    }

    async fn try_delete(&self, key: &str) -> CacheResult<bool> {
        match &self.backend {
            Backend::Disabled => Err(CacheError::Disabled),
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                let removed: i64 = conn.del(key).await?;
                Ok(removed > 0)
            }
            Backend::Memory(store) => Ok(store.lock().await.remove(key).is_some()),
        }
    }

    async fn try_exists(&self, key: &str) -> CacheResult<bool> {
        match &self.backend {
            Backend::Disabled => Err(CacheError::Disabled),
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                Ok(conn.exists(key).await?)
            }
            Backend::Memory(store) => Ok(store.lock().await.contains_key(key)),
        }
    }

    // -------------------------------------------------------------------------
    // Public, failure-swallowing operations
    // -------------------------------------------------------------------------

    /// Cached value for `key`. Misses, store errors and undecodable entries
    /// all return `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }
        match self.try_get(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache get failed");
                None
            }
        }
    }

    /// Stores `value` as JSON with the configured TTL. Returns whether the
    /// write succeeded.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match self.try_set(key, value).await {
            Ok(()) => {
                debug!(key, ttl_secs = self.ttl_secs, "Cached value");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "Cache set failed");
                false
            }
        }
    }

    /// Removes `key`. Returns `true` only if an entry was deleted.
    pub async fn delete(&self, key: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match self.try_delete(key).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(key, error = %e, "Cache delete failed");
                false
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match self.try_exists(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key, error = %e, "Cache exists failed");
                false
            }
        }
    }

    /// Pings Redis for the health endpoint.
    pub async fn status(&self) -> CacheStatus {
        let mut conn = match &self.backend {
            Backend::Disabled => return CacheStatus::NotConfigured,
            Backend::Memory(_) => return CacheStatus::InMemory,
            Backend::Redis(conn) => conn.clone(),
        };
        let pong: Result<String, redis::RedisError> = redis::cmd("PING").query_async(&mut conn).await;
        match pong {
            Ok(_) => CacheStatus::Connected,
            Err(e) => {
                warn!(error = %e, "Redis ping failed");
                CacheStatus::Unavailable
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
