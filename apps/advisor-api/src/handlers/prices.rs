//! Price lookup for front-end display.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use krishi_core::aggregate::select_quote;
use krishi_core::recommendation::demand_for;
use krishi_core::reference::MspEntry;
use krishi_core::validation::validate_crop_name;
use krishi_core::{Demand, MarketData, PriceQuote, PriceSource};
use serde::Serialize;

use super::Success;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLookup {
    pub crop_name: String,
    /// Every fiscal year on record.
    pub msp: Option<MspEntry>,
    pub msp_quote: Option<PriceQuote>,
    /// Market quote with its trade history.
    pub market: Option<MarketData>,
    /// The quote income projections use.
    pub selected: Option<PriceQuote>,
    pub demand: Demand,
}

/// `GET /api/prices/{crop}`
pub async fn prices(
    State(state): State<Arc<AppState>>,
    Path(crop): Path<String>,
) -> ApiResult<Json<Success<PriceLookup>>> {
    let crop = validate_crop_name(&crop)?;
    let reference = &state.reference;

    let msp = reference.msp_entry(&crop).cloned();
    let market = reference.market_data(&crop);
    if msp.is_none() && market.is_none() {
        return Err(ApiError::not_found(&format!("Price data for '{}'", crop)));
    }

    Ok(Json(Success::new(PriceLookup {
        msp_quote: msp.as_ref().and_then(MspEntry::quote),
        selected: select_quote(reference, &crop, PriceSource::Market),
        demand: demand_for(reference, &crop),
        crop_name: crop,
        msp,
        market,
    })))
}
