//! Cache invalidation.
//!
//! `DELETE /api/cache/{prefix}` takes the same body that was sent to the
//! generating endpoint and drops the matching entry, so the next request
//! regenerates it.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use krishi_core::cache_key::cache_key;
use krishi_core::recommendation::recommend;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{CropRequest, JsonBody, Success};
use crate::error::{ApiError, ApiResult};
use crate::services::{insights, natural_farming, operational};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invalidation {
    pub key: String,
    pub deleted: bool,
}

/// Key the generating endpoint would have used for `body`.
pub(crate) fn key_for(state: &AppState, prefix: &str, body: &Value) -> ApiResult<String> {
    let req = CropRequest::from_body(body)?;
    let params = match prefix {
        insights::CACHE_PREFIX => {
            let rec = recommend(&state.reference, &req.crop_name, req.farmer.as_ref(), req.land_area);
            insights::cache_params(&rec, req.farmer.as_ref())
        }
        operational::CACHE_PREFIX => {
            let rec = recommend(&state.reference, &req.crop_name, req.farmer.as_ref(), req.land_area);
            operational::cache_params(&rec, req.farmer.as_ref())
        }
        natural_farming::CACHE_PREFIX => natural_farming::cache_params(&req.crop_name, req.farmer.as_ref()),
        other => return Err(ApiError::not_found(&format!("Cache prefix '{}'", other))),
    };
    Ok(cache_key(prefix, &params))
}

/// `DELETE /api/cache/{prefix}`
pub async fn invalidate(
    State(state): State<Arc<AppState>>,
    Path(prefix): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<Invalidation>>> {
    let key = key_for(&state, &prefix, &body)?;
    let deleted = state.cache.delete(&key).await;
    info!(%key, deleted, "Cache invalidation requested");
    Ok(Json(Success::new(Invalidation { key, deleted })))
}
