//! Operational details: equipment, effort, resources, maturity, risk.
//!
//! ```text
//!                     ┌─────────── generator ok + JSON ──► coerce(defaults) ─► cache
//! operational_details ┤
//!                     └─────────── absent / error / no JSON ──► category template
//! ```
//!
//! Only coerced (generated) details are cached under `operational:<hash>`.
//! Templates are cheap to rebuild.
//!
//! [`details_for_all`] fans out over a recommendation list. Each crop runs on
//! its own task; the shared semaphore in `AppState` caps how many reach the
//! provider at once. Results come back in input order.

use std::sync::Arc;

use krishi_core::cache_key::cache_key;
use krishi_core::operational::{coerce, coercion_defaults, template_details};
use krishi_core::parse::parse_generated_json;
use krishi_core::prompt::operational_prompt;
use krishi_core::{CropRecommendation, FarmerData, OperationalDetails};
use serde_json::{json, Value};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::generation::{generate, log_failure};
use crate::state::AppState;

pub const CACHE_PREFIX: &str = "operational";

/// Parameters identifying one operational generation. The prompt and the
/// market block read costs, status and location from the farmer data, so all
/// of it is part of the key.
pub fn cache_params(rec: &CropRecommendation, farmer: Option<&FarmerData>) -> Value {
    json!({
        "cropName": rec.crop_name,
        "farmerData": farmer,
        "landArea": rec.land_area_hectares,
        "expectedIncome": rec.expected_income,
        "demand": rec.demand,
    })
}

/// Details for one recommendation. Never fails.
pub async fn operational_details(
    state: &AppState,
    rec: &CropRecommendation,
    farmer: Option<&FarmerData>,
) -> OperationalDetails {
    let key = cache_key(CACHE_PREFIX, &cache_params(rec, farmer));
    if let Some(hit) = state.cache.get::<OperationalDetails>(&key).await {
        debug!(%key, "Operational details cache hit");
        return hit;
    }

    let text = match generate(state, &operational_prompt(rec, farmer)).await {
        Ok(text) => text,
        Err(e) => {
            log_failure("Operational details", &rec.crop_name, &e);
            return template_details(&rec.crop_name, rec);
        }
    };

    match parse_generated_json(&text) {
        Some(map) => {
            let details = coerce(&Value::Object(map), &coercion_defaults(rec));
            state.cache.set(&key, &details).await;
            details
        }
        None => {
            warn!(crop = %rec.crop_name, "Generated operational details were not JSON, using template");
            template_details(&rec.crop_name, rec)
        }
    }
}

/// Details for every recommendation, in input order.
pub async fn details_for_all(
    state: Arc<AppState>,
    recs: &[CropRecommendation],
    farmer: Option<&FarmerData>,
) -> Vec<OperationalDetails> {
    let mut tasks = JoinSet::new();
    for (index, rec) in recs.iter().enumerate() {
        let state = Arc::clone(&state);
        let rec = rec.clone();
        let farmer = farmer.cloned();
        tasks.spawn(async move {
            let details = operational_details(&state, &rec, farmer.as_ref()).await;
            (index, details)
        });
    }

    let mut slots: Vec<Option<OperationalDetails>> = vec![None; recs.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, details)) => slots[index] = Some(details),
            Err(e) => error!(error = %e, "Operational details task failed"),
        }
    }

    slots
        .into_iter()
        .zip(recs)
        .map(|(slot, rec)| slot.unwrap_or_else(|| template_details(&rec.crop_name, rec)))
        .collect()
}
