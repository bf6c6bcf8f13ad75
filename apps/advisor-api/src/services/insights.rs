//! Narrative insights for a single recommendation.
//!
//! Cached under `insights:<hash>`. Failures are never cached so the next
//! request retries the provider.

use krishi_core::cache_key::cache_key;
use krishi_core::parse::{parse_or_raw, RAW_INSIGHTS_KEY};
use krishi_core::prompt::insights_prompt;
use krishi_core::{CropRecommendation, FarmerData};
use serde_json::{json, Value};
use tracing::debug;

use super::generation::{generate, log_failure, unavailable};
use crate::state::AppState;

pub const CACHE_PREFIX: &str = "insights";

/// Parameters identifying one insights generation.
pub fn cache_params(rec: &CropRecommendation, farmer: Option<&FarmerData>) -> Value {
    json!({
        "cropName": rec.crop_name,
        "farmerData": farmer,
        "landArea": rec.land_area_hectares,
    })
}

/// Insights for `rec`: parsed generator output (or `rawInsights` when it is
/// not JSON), else `{ available: false, message }`.
pub async fn insights(state: &AppState, rec: &CropRecommendation, farmer: Option<&FarmerData>) -> Value {
    let key = cache_key(CACHE_PREFIX, &cache_params(rec, farmer));
    if let Some(hit) = state.cache.get::<Value>(&key).await {
        debug!(%key, "Insights cache hit");
        return hit;
    }

    match generate(state, &insights_prompt(rec, farmer)).await {
        Ok(text) => {
            let value = parse_or_raw(&text, RAW_INSIGHTS_KEY);
            state.cache.set(&key, &value).await;
            value
        }
        Err(e) => {
            log_failure("Insights", &rec.crop_name, &e);
            unavailable("AI insights are currently unavailable. Recommendations are based on market data.")
        }
    }
}
