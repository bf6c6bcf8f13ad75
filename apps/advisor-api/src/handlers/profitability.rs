//! Profitability endpoint.
//!
//! Returns the raw figures for clients that compute with them, plus a
//! `formatted` block of display strings:
//!
//! ```text
//! "formatted": {
//!   "totalCost": "₹73,000",
//!   "expectedIncome": "₹1,00,000",
//!   "profit": "₹27,000",
//!   "roi": "36.99%",
//!   "pricePerQuintal": "₹2,500"
//! }
//! ```

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use krishi_core::money::{format_currency, format_percentage};
use krishi_core::profitability::calculate_with_source;
use krishi_core::scoring::success_breakdown;
use krishi_core::validation::require_fields;
use krishi_core::{Demand, PriceSource, ProfitabilityResult, SuccessBreakdown, ValidationError};
use serde::Serialize;
use serde_json::Value;

use super::{crop_name, farmer_data, JsonBody, Success};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFigures {
    pub total_cost: String,
    pub expected_income: String,
    pub profit: String,
    pub roi: String,
    pub price_per_quintal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_income: Option<String>,
}

impl FormattedFigures {
    pub fn from_result(result: &ProfitabilityResult) -> Self {
        FormattedFigures {
            total_cost: format_currency(result.total_cost),
            expected_income: format_currency(result.expected_income),
            profit: format_currency(result.profit),
            roi: format_percentage(result.roi, 2),
            price_per_quintal: format_currency(result.price_per_quintal),
            actual_income: result.actual_income.map(format_currency),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityReport {
    pub crop_name: String,
    #[serde(flatten)]
    pub profitability: ProfitabilityResult,
    pub success_rate: u8,
    pub success_breakdown: SuccessBreakdown,
    pub demand: Demand,
    pub formatted: FormattedFigures,
}

/// `POST /api/profitability`
///
/// Body: `{ cropName, farmerData, priceSource? }`. `priceSource` is `MSP` or
/// `MARKET` (default) and only changes which table is tried first.
pub async fn profitability(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<Success<ProfitabilityReport>>> {
    require_fields(&body, &["cropName", "farmerData"])?;
    let crop = crop_name(&body)?;
    let farmer = farmer_data(&body)?
        .ok_or_else(|| ApiError::validation("Missing required field(s): farmerData"))?;

    let preferred = match body.get("priceSource").and_then(Value::as_str) {
        Some(raw) => PriceSource::from_str(raw).map_err(|reason| ValidationError::InvalidFormat {
            field: "priceSource".to_string(),
            reason,
        })?,
        None => PriceSource::default(),
    };

    let result = calculate_with_source(&state.reference, &farmer, &crop, preferred);
    let market_demand = state.reference.market_data(&crop).map(|market| market.demand);
    let breakdown = success_breakdown(&farmer, &result, market_demand);

    Ok(Json(Success::new(ProfitabilityReport {
        demand: market_demand.unwrap_or_default(),
        crop_name: crop,
        formatted: FormattedFigures::from_result(&result),
        profitability: result,
        success_rate: breakdown.total,
        success_breakdown: breakdown,
    })))
}
