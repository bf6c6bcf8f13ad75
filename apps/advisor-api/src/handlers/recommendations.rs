//! Recommendation endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use krishi_core::recommendation::{recommend, top_n};
use krishi_core::validation::{validate_crop_list, validate_top_n};
use krishi_core::{CropRecommendation, OperationalDetails, ValidationError};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::{farmer_data, land_area, CropRequest, JsonBody, Success};
use crate::error::ApiResult;
use crate::services::operational::details_for_all;
use crate::state::AppState;

/// A ranked recommendation, optionally with operational details attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecommendation {
    pub rank: usize,
    #[serde(flatten)]
    pub recommendation: CropRecommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operational_details: Option<OperationalDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationList {
    pub recommendations: Vec<RankedRecommendation>,
    pub candidates: usize,
    pub top_n: usize,
    pub land_area_hectares: f64,
}

/// `POST /api/recommendations`
///
/// Body: `{ crops?, topN?, landArea?, farmerData?, includeOperationalDetails? }`.
/// Without `crops` every crop in the market table is ranked.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<RecommendationList>>> {
    let crops = match body.get("crops") {
        None | Some(Value::Null) => state.reference.market_crops(),
        Some(list) => validate_crop_list(list)?,
    };

    let n = match body.get("topN") {
        None | Some(Value::Null) => state.config.default_top_n,
        Some(value) => {
            let n = value.as_i64().ok_or_else(|| ValidationError::InvalidFormat {
                field: "topN".to_string(),
                reason: "must be an integer".to_string(),
            })?;
            validate_top_n(n)?
        }
    };

    let farmer = farmer_data(&body)?;
    let land_area = land_area(&body, farmer.as_ref())?;
    let include_details = body
        .get("includeOperationalDetails")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let ranked = top_n(&state.reference, &crops, farmer.as_ref(), n, land_area)?;
    info!(
        candidates = crops.len(),
        returned = ranked.len(),
        include_details,
        "Ranked crop recommendations"
    );

    let details: Vec<Option<OperationalDetails>> = if include_details {
        details_for_all(Arc::clone(&state), &ranked, farmer.as_ref())
            .await
            .into_iter()
            .map(Some)
            .collect()
    } else {
        vec![None; ranked.len()]
    };

    let recommendations = ranked
        .into_iter()
        .zip(details)
        .enumerate()
        .map(|(i, (recommendation, operational_details))| RankedRecommendation {
            rank: i + 1,
            recommendation,
            operational_details,
        })
        .collect();

    Ok(Json(Success::new(RecommendationList {
        recommendations,
        candidates: crops.len(),
        top_n: n,
        land_area_hectares: land_area,
    })))
}

/// `POST /api/recommendations/crop` → `{ success, recommendation }`
pub async fn crop_recommendation(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Value>> {
    let req = CropRequest::from_body(&body)?;
    let recommendation = recommend(&state.reference, &req.crop_name, req.farmer.as_ref(), req.land_area);
    Ok(Json(json!({
        "success": true,
        "recommendation": recommendation,
    })))
}
