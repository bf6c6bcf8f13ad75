//! Advisor API configuration module.
//!
//! Configuration is layered with the `config` crate: built-in defaults, then an
//! optional `krishi.toml` in the working directory, then environment
//! variables. Later layers win.
//!
//! ```text
//! defaults ──► krishi.toml (optional) ──► env (PORT, REDIS_URL, LLM_API_KEY, ...)
//! ```

use std::net::{IpAddr, SocketAddr};

use config::{Config, Environment, File};
use krishi_cache::{CacheConfig, DEFAULT_TTL_HOURS};
use krishi_core::{DEFAULT_TOP_N, MAX_CROPS_PER_REQUEST};
use krishi_llm::config::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use krishi_llm::LlmConfig;
use serde::Serialize;

/// Base name of the optional config file (`krishi.toml`).
const CONFIG_FILE: &str = "krishi";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_LLM_MAX_CONCURRENCY: usize = 4;

/// Advisor API configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorConfig {
    /// HTTP port
    pub port: u16,

    /// Address to bind
    pub bind_addr: IpAddr,

    /// Redis connection string (optional; caching is off without it)
    pub redis_url: Option<String>,

    /// TTL for cached generations
    pub cache_ttl_hours: u64,

    /// Chat completions endpoint
    pub llm_api_url: String,

    /// Provider key (optional; fallbacks are used without it)
    #[serde(skip_serializing)]
    pub llm_api_key: Option<String>,

    pub llm_model: String,

    pub llm_timeout_secs: u64,

    /// Upper bound on concurrent per-crop generation calls
    pub llm_max_concurrency: usize,

    /// Top-N when a recommendation request omits it
    pub default_top_n: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            redis_url: None,
            cache_ttl_hours: DEFAULT_TTL_HOURS,
            llm_api_url: DEFAULT_API_URL.to_string(),
            llm_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_TIMEOUT_SECS,
            llm_max_concurrency: DEFAULT_LLM_MAX_CONCURRENCY,
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from defaults, `krishi.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default())
            .build()?;
        Self::from_settings(&settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("cache_ttl_hours", DEFAULT_TTL_HOURS as i64)?
            .set_default("llm_api_url", DEFAULT_API_URL)?
            .set_default("llm_model", DEFAULT_MODEL)?
            .set_default("llm_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("llm_max_concurrency", DEFAULT_LLM_MAX_CONCURRENCY as i64)?
            .set_default("default_top_n", DEFAULT_TOP_N as i64)?)
    }

    /// Reads and validates every key from an already-built source stack.
    pub fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        let config = AdvisorConfig {
            port: parse(settings, "port", "PORT")?,

            bind_addr: settings
                .get_string("bind_addr")
                .ok()
                .and_then(|addr| addr.trim().parse().ok())
                .ok_or_else(|| ConfigError::InvalidValue("BIND_ADDR".to_string()))?,

            redis_url: optional_string(settings, "redis_url"),

            cache_ttl_hours: parse(settings, "cache_ttl_hours", "CACHE_TTL_HOURS")?,

            llm_api_url: settings
                .get_string("llm_api_url")
                .map_err(|_| ConfigError::InvalidValue("LLM_API_URL".to_string()))?,

            llm_api_key: optional_string(settings, "llm_api_key"),

            llm_model: settings
                .get_string("llm_model")
                .map_err(|_| ConfigError::InvalidValue("LLM_MODEL".to_string()))?,

            llm_timeout_secs: parse(settings, "llm_timeout_secs", "LLM_TIMEOUT_SECS")?,

            llm_max_concurrency: parse(settings, "llm_max_concurrency", "LLM_MAX_CONCURRENCY")?,

            default_top_n: parse(settings, "default_top_n", "DEFAULT_TOP_N")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_hours == 0 {
            return Err(ConfigError::InvalidValue("CACHE_TTL_HOURS".to_string()));
        }
        if self.llm_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("LLM_TIMEOUT_SECS".to_string()));
        }
        if self.llm_max_concurrency == 0 {
            return Err(ConfigError::InvalidValue("LLM_MAX_CONCURRENCY".to_string()));
        }
        if self.default_top_n == 0 || self.default_top_n > MAX_CROPS_PER_REQUEST {
            return Err(ConfigError::InvalidValue("DEFAULT_TOP_N".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Cache settings, or `None` when `REDIS_URL` is unset.
    pub fn cache_config(&self) -> Option<CacheConfig> {
        self.redis_url
            .as_ref()
            .map(|url| CacheConfig::new(url.clone()).ttl_hours(self.cache_ttl_hours))
    }

    /// Provider settings, or `None` when `LLM_API_KEY` is unset.
    pub fn llm_config(&self) -> Option<LlmConfig> {
        self.llm_api_key.as_ref().map(|key| {
            LlmConfig::new(key.clone())
                .with_api_url(self.llm_api_url.clone())
                .with_model(self.llm_model.clone())
                .with_timeout_secs(self.llm_timeout_secs)
        })
    }
}

fn parse<T: std::str::FromStr>(settings: &Config, key: &str, env_name: &str) -> Result<T, ConfigError> {
    settings
        .get_string(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(|| ConfigError::InvalidValue(env_name.to_string()))
}

/// Blank values count as unset.
fn optional_string(settings: &Config, key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
}
