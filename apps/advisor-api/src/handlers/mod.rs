//! HTTP handlers.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                       service health                    │
//! │  GET    /api/prices/{crop}            MSP + market quotes               │
//! │  POST   /api/recommendations          ranked top-N                      │
//! │  POST   /api/recommendations/crop     single crop                       │
//! │  POST   /api/profitability            figures + formatted + breakdown   │
//! │  POST   /api/insights                 narrative insights (cached)       │
//! │  POST   /api/operational-details      operational details (cached)      │
//! │  POST   /api/natural-farming          natural farming guidance (cached) │
//! │  DELETE /api/cache/{prefix}           drop one memoized generation      │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bodies are read as raw JSON first so required fields can be checked and
//! reported together before anything is deserialized.

pub mod cache;
pub mod generation;
pub mod health;
pub mod prices;
pub mod profitability;
pub mod recommendations;

use axum::extract::FromRequest;
use krishi_core::validation::{require_fields, validate_crop_name, validate_land_area};
use krishi_core::{FarmerData, ValidationError, DEFAULT_LAND_AREA_HECTARES};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// `axum::Json` with rejections rendered as the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Success { success: true, data }
    }
}

fn invalid_format(field: &str, reason: &str) -> ApiError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Required, trimmed `cropName`.
pub(crate) fn crop_name(body: &Value) -> ApiResult<String> {
    require_fields(body, &["cropName"])?;
    let name = body["cropName"]
        .as_str()
        .ok_or_else(|| invalid_format("cropName", "must be a string"))?;
    Ok(validate_crop_name(name)?)
}

/// Optional `farmerData`. Inner fields are read leniently.
pub(crate) fn farmer_data(body: &Value) -> ApiResult<Option<FarmerData>> {
    match body.get("farmerData") {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => Ok(Some(serde_json::from_value(value.clone())?)),
        Some(_) => Err(invalid_format("farmerData", "must be an object")),
    }
}

/// `landArea` from the body, else the farmer record, else 0.6 ha.
pub(crate) fn land_area(body: &Value, farmer: Option<&FarmerData>) -> ApiResult<f64> {
    match body.get("landArea") {
        None | Some(Value::Null) => {}
        Some(value) => {
            let hectares = value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                .ok_or_else(|| invalid_format("landArea", "must be a number"))?;
            return Ok(validate_land_area(hectares)?);
        }
    }

    match farmer.and_then(|f| f.land_area_hectares).filter(|ha| *ha > 0.0) {
        Some(hectares) => Ok(validate_land_area(hectares)?),
        None => Ok(DEFAULT_LAND_AREA_HECTARES),
    }
}

/// Everything a single-crop endpoint needs from its body.
pub(crate) struct CropRequest {
    pub crop_name: String,
    pub farmer: Option<FarmerData>,
    pub land_area: f64,
}

impl CropRequest {
    pub fn from_body(body: &Value) -> ApiResult<Self> {
        let crop_name = crop_name(body)?;
        let farmer = farmer_data(body)?;
        let land_area = land_area(body, farmer.as_ref())?;
        Ok(CropRequest {
            crop_name,
            farmer,
            land_area,
        })
    }
}
