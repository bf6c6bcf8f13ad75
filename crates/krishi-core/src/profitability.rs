//! # Profitability Calculator
//!
//! Turns a farmer's recorded stages and yield into profit and ROI.
//!
//! ## Formula
//! ```text
//! yield_q        = (farmer.yield kg  or 7500 kg) / 100
//! total_cost     = Σ stages Σ categories totalCost
//! expected       = price_per_quintal × yield_q
//! profit         = expected − total_cost
//! roi            = total_cost > 0 ? round2(profit / total_cost × 100) : 0
//! per_quintal    = yield_q > 0 ? round2(profit / yield_q) : 0
//! ```
//!
//! Nothing in here can fail: absent fields fall back to zero or to the
//! documented defaults.

use crate::aggregate::{cost_breakdown, expected_income, total_cost};
use crate::reference::ReferenceData;
use crate::round2;
use crate::types::{FarmerData, PriceSource, ProfitabilityResult};

/// ROI in percent, two decimals. Zero cost gives zero, never NaN/Infinity.
pub fn roi(profit: f64, total_cost: f64) -> f64 {
    if total_cost > 0.0 {
        round2(profit / total_cost * 100.0)
    } else {
        0.0
    }
}

/// Assembles a result from already-aggregated figures.
pub(crate) fn build_result(
    total_cost: f64,
    expected_income: f64,
    yield_quintals: f64,
    price_per_quintal: f64,
    price_source: String,
) -> ProfitabilityResult {
    let profit = expected_income - total_cost;
    ProfitabilityResult {
        total_cost,
        expected_income,
        actual_income: None,
        profit,
        roi: roi(profit, total_cost),
        profit_per_unit_yield: if yield_quintals > 0.0 {
            round2(profit / yield_quintals)
        } else {
            0.0
        },
        cost_breakdown: Default::default(),
        yield_quintals,
        price_per_quintal,
        price_source,
    }
}

/// Profitability of `crop` for the given farmer record, pricing from the
/// preferred table first.
pub fn calculate_with_source(
    reference: &ReferenceData,
    farmer: &FarmerData,
    crop: &str,
    preferred: PriceSource,
) -> ProfitabilityResult {
    let yield_quintals = farmer.yield_quintals();
    let cost = total_cost(&farmer.stages);
    let income = expected_income(reference, crop, yield_quintals, preferred);

    let mut result = build_result(
        cost,
        income.expected_income,
        yield_quintals,
        income.price_per_unit,
        income.source_label,
    );
    result.actual_income = farmer.actual_income;
    result.cost_breakdown = cost_breakdown(&farmer.stages);
    result
}

/// Profitability of `crop` for the given farmer record (market price first).
pub fn calculate(reference: &ReferenceData, farmer: &FarmerData, crop: &str) -> ProfitabilityResult {
    calculate_with_source(reference, farmer, crop, PriceSource::Market)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CropStage;
    use approx::assert_relative_eq;

    fn rice_farmer() -> FarmerData {
        FarmerData {
            crop_name: Some("Rice".to_string()),
            status: Some("COMPLETED".to_string()),
            yield_kg: Some(4000.0),
            stages: vec![
                CropStage::with_costs("Land Preparation", &[("ploughing", 20000.0)]),
                CropStage::with_costs("Sowing", &[("seed_cost", 15000.0)]),
                CropStage::with_costs("Harvesting", &[("labour_cost", 38000.0)]),
            ],
            ..FarmerData::default()
        }
    }

    #[test]
    fn test_rice_end_to_end_figures() {
        // Builtin market price for rice is 2500/q; 4000 kg = 40 q.
        let result = calculate(&ReferenceData::builtin(), &rice_farmer(), "Rice");
        assert_relative_eq!(result.total_cost, 73000.0);
        assert_relative_eq!(result.expected_income, 100000.0);
        assert_relative_eq!(result.profit, 27000.0);
        assert_relative_eq!(result.roi, 36.99);
        assert_relative_eq!(result.profit_per_unit_yield, 675.0);
        assert_eq!(result.price_source, "Market Bangalore");
        assert_eq!(result.cost_breakdown.len(), 3);
    }

    #[test]
    fn test_roi_zero_guard() {
        assert_eq!(roi(5000.0, 0.0), 0.0);
        assert_eq!(roi(-5000.0, 0.0), 0.0);
        assert_eq!(roi(0.0, 0.0), 0.0);
        assert!(roi(1.0, 0.0).is_finite());
    }

    #[test]
    fn test_no_stages_means_zero_cost_and_zero_roi() {
        let farmer = FarmerData::default();
        let result = calculate(&ReferenceData::builtin(), &farmer, "Tomato");
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.roi, 0.0);
        // default 7500 kg at 2000/q
        assert_relative_eq!(result.yield_quintals, 75.0);
        assert_relative_eq!(result.expected_income, 150000.0);
    }

    #[test]
    fn test_unknown_crop_degrades_to_zero_price() {
        let result = calculate(&ReferenceData::builtin(), &rice_farmer(), "Dragon Fruit");
        assert_eq!(result.price_per_quintal, 0.0);
        assert_eq!(result.expected_income, 0.0);
        assert_relative_eq!(result.profit, -73000.0);
        assert_relative_eq!(result.roi, -100.0);
    }

    #[test]
    fn test_msp_source_preference() {
        let result = calculate_with_source(
            &ReferenceData::builtin(),
            &rice_farmer(),
            "Rice",
            PriceSource::Msp,
        );
        assert_relative_eq!(result.price_per_quintal, 2300.0);
        assert_eq!(result.price_source, "MSP 2024-25");
    }

    #[test]
    fn test_actual_income_is_carried() {
        let farmer = FarmerData {
            actual_income: Some(95000.0),
            ..rice_farmer()
        };
        let result = calculate(&ReferenceData::builtin(), &farmer, "Rice");
        assert_eq!(result.actual_income, Some(95000.0));
    }
}
