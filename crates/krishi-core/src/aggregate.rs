//! # Cost / Income Aggregation
//!
//! ```text
//! stages[] ──► categories[] ──► data.totalCost
//!    │               │                │
//!    │               │                └── missing / malformed → 0
//!    │               └── Σ per stage  ──► cost_breakdown (zero stages dropped)
//!    └── Σ all stages ──────────────────► total_cost
//!
//! crop name ──► resolver ──► PriceQuote ──► price × yield (quintals)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceData;
use crate::types::{CropStage, PriceQuote, PriceSource};

/// Sums every category's `totalCost` across every stage.
pub fn total_cost(stages: &[CropStage]) -> f64 {
    stages
        .iter()
        .flat_map(|stage| stage.categories.iter())
        .map(|category| category.cost())
        .sum()
}

/// Per-stage cost. Stages with zero cost are omitted; repeated stage names
/// are summed together.
pub fn cost_breakdown(stages: &[CropStage]) -> BTreeMap<String, f64> {
    let mut breakdown = BTreeMap::new();
    for stage in stages {
        let cost: f64 = stage.categories.iter().map(|c| c.cost()).sum();
        if cost > 0.0 {
            *breakdown.entry(stage.name().to_string()).or_insert(0.0) += cost;
        }
    }
    breakdown
}

/// Price used for an income projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEstimate {
    /// Rupees per quintal. Zero when neither table knows the crop.
    pub price_per_unit: f64,
    pub source_label: String,
    pub expected_income: f64,
    pub quote: Option<PriceQuote>,
}

/// Label used when neither table resolves the crop.
pub const NO_PRICE_LABEL: &str = "No price data";

/// Picks exactly one quote for `crop`.
///
/// The preferred table is tried first and the other one second. With the
/// default preference (market) this gives: market when available, else MSP.
pub fn select_quote(
    reference: &ReferenceData,
    crop: &str,
    preferred: PriceSource,
) -> Option<PriceQuote> {
    match preferred {
        PriceSource::Market => reference
            .market_quote(crop)
            .or_else(|| reference.msp_quote(crop)),
        PriceSource::Msp => reference
            .msp_quote(crop)
            .or_else(|| reference.market_quote(crop)),
    }
}

/// Expected income for `yield_quintals` of `crop`.
///
/// An unresolved crop is not an error: price and income are both zero.
pub fn expected_income(
    reference: &ReferenceData,
    crop: &str,
    yield_quintals: f64,
    preferred: PriceSource,
) -> IncomeEstimate {
    match select_quote(reference, crop, preferred) {
        Some(quote) => IncomeEstimate {
            price_per_unit: quote.price_per_unit,
            source_label: quote.source_label.clone(),
            expected_income: quote.price_per_unit * yield_quintals,
            quote: Some(quote),
        },
        None => IncomeEstimate {
            price_per_unit: 0.0,
            source_label: NO_PRICE_LABEL.to_string(),
            expected_income: 0.0,
            quote: None,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
