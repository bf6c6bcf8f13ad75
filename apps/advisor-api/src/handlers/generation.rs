//! Endpoints backed by the text generator: insights, operational details,
//! natural farming guidance.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use krishi_core::recommendation::recommend;
use krishi_core::OperationalDetails;
use serde_json::{json, Value};

use super::{CropRequest, JsonBody, Success};
use crate::error::ApiResult;
use crate::services::{insights, natural_farming, operational};
use crate::state::AppState;

/// `POST /api/insights`
pub async fn insights(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<Value>>> {
    let req = CropRequest::from_body(&body)?;
    let rec = recommend(&state.reference, &req.crop_name, req.farmer.as_ref(), req.land_area);
    let insights = insights::insights(&state, &rec, req.farmer.as_ref()).await;

    Ok(Json(Success::new(json!({
        "cropName": rec.crop_name,
        "successRate": rec.success_rate,
        "expectedIncome": rec.expected_income,
        "insights": insights,
    }))))
}

/// `POST /api/operational-details`
pub async fn operational_details(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<OperationalDetails>>> {
    let req = CropRequest::from_body(&body)?;
    let rec = recommend(&state.reference, &req.crop_name, req.farmer.as_ref(), req.land_area);
    let details = operational::operational_details(&state, &rec, req.farmer.as_ref()).await;
    Ok(Json(Success::new(details)))
}

/// `POST /api/natural-farming`
pub async fn natural_farming(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<Value>>> {
    let req = CropRequest::from_body(&body)?;
    let guidance = natural_farming::guidance(&state, &req.crop_name, req.farmer.as_ref()).await;

    Ok(Json(Success::new(json!({
        "cropName": req.crop_name,
        "guidance": guidance,
    }))))
}
