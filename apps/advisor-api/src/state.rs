//! Shared application state.
//!
//! Built once in `main` and handed to every handler behind an `Arc`.
//!
//! ```text
//! AppState
//!   ├── config       AdvisorConfig
//!   ├── reference    Arc<ReferenceData>        immutable MSP + market tables
//!   ├── cache        CacheService              disabled without REDIS_URL
//!   ├── generator    Option<Arc<dyn TextGenerator>>   None without LLM_API_KEY
//!   └── llm_permits  Arc<Semaphore>            bounds per-crop fan-out
//! ```

use std::sync::Arc;

use krishi_cache::CacheService;
use krishi_core::ReferenceData;
use krishi_llm::{ChatClient, TextGenerator};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::AdvisorConfig;

pub struct AppState {
    pub config: AdvisorConfig,
    pub reference: Arc<ReferenceData>,
    pub cache: CacheService,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub llm_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        config: AdvisorConfig,
        reference: ReferenceData,
        cache: CacheService,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let llm_permits = Arc::new(Semaphore::new(config.llm_max_concurrency));
        AppState {
            config,
            reference: Arc::new(reference),
            cache,
            generator,
            llm_permits,
        }
    }

    /// Connects to Redis and builds the provider client from `config`.
    ///
    /// Neither is required: an unreachable Redis or a missing key only
    /// disables that feature.
    pub async fn from_config(config: AdvisorConfig) -> Self {
        let cache_config = config.cache_config();
        let cache = CacheService::connect_or_disabled(cache_config.as_ref()).await;

        let generator: Option<Arc<dyn TextGenerator>> = match config.llm_config() {
            Some(llm_config) => match ChatClient::new(llm_config) {
                Ok(client) => {
                    info!(model = %client.config().model, "Text generation enabled");
                    Some(Arc::new(client) as Arc<dyn TextGenerator>)
                }
                Err(e) => {
                    warn!(error = %e, "Invalid LLM configuration, continuing without text generation");
                    None
                }
            },
            None => {
                info!("LLM_API_KEY not set, using static fallbacks");
                None
            }
        };

        AppState::new(config, ReferenceData::builtin(), cache, generator)
    }

    pub fn llm_configured(&self) -> bool {
        self.generator.is_some()
    }
}
