//! Natural farming guidance (Jeevamrutha, Beejamrutha, mulching,
//! intercropping) for a crop.
//!
//! Cached under `natural-farming:<hash>`.

use krishi_core::cache_key::cache_key;
use krishi_core::parse::{parse_or_raw, RAW_ANALYSIS_KEY};
use krishi_core::prompt::natural_farming_prompt;
use krishi_core::FarmerData;
use serde_json::{json, Value};
use tracing::debug;

use super::generation::{generate, log_failure, unavailable};
use crate::state::AppState;

pub const CACHE_PREFIX: &str = "natural-farming";

pub fn cache_params(crop: &str, farmer: Option<&FarmerData>) -> Value {
    json!({
        "cropName": crop,
        "farmerData": farmer,
    })
}

pub async fn guidance(state: &AppState, crop: &str, farmer: Option<&FarmerData>) -> Value {
    let key = cache_key(CACHE_PREFIX, &cache_params(crop, farmer));
    if let Some(hit) = state.cache.get::<Value>(&key).await {
        debug!(%key, "Natural farming cache hit");
        return hit;
    }

    match generate(state, &natural_farming_prompt(crop, farmer)).await {
        Ok(text) => {
            let value = parse_or_raw(&text, RAW_ANALYSIS_KEY);
            state.cache.set(&key, &value).await;
            value
        }
        Err(e) => {
            log_failure("Natural farming guidance", crop, &e);
            unavailable("Natural farming guidance is currently unavailable.")
        }
    }
}
