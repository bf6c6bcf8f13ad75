//! # Recommendation Generator
//!
//! Composes profitability and scoring into one [`CropRecommendation`] per
//! crop, and ranks a crop list by expected income.
//!
//! ## Two Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recommend(crop, farmer?, land_area)                                    │
//! │                                                                         │
//! │   farmer = Some ──► FARMER DATA MODE                                    │
//! │                     profitability::calculate + scoring::success_rate    │
//! │                     successBreakdown present                            │
//! │                                                                         │
//! │   farmer = None ──► ESTIMATED MODE ("what if")                          │
//! │                     75 q yield, ₹1,10,000 cost                          │
//! │                     success 78 (HIGH) / 65 (other) / 60 (no market)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ranking uses gross `expectedIncome`, not profit or ROI.

use crate::aggregate::expected_income;
use crate::error::{CoreError, CoreResult};
use crate::profitability::{build_result, calculate};
use crate::reference::ReferenceData;
use crate::scoring::{estimated_success_rate, success_breakdown};
use crate::types::{CropRecommendation, Demand, FarmerData, PriceSource, RecommendationMode};
use crate::{ESTIMATED_COST, MAX_CROPS_PER_REQUEST, REFERENCE_YIELD_QUINTALS};

/// Builds the recommendation for a single crop.
pub fn recommend(
    reference: &ReferenceData,
    crop: &str,
    farmer: Option<&FarmerData>,
    land_area_hectares: f64,
) -> CropRecommendation {
    let crop_name = crop.trim().to_string();
    let market_data = reference.market_data(&crop_name);
    let market_demand = market_data.as_ref().map(|m| m.demand);
    let demand = market_demand.unwrap_or_default();

    match farmer {
        Some(farmer) => {
            let profitability = calculate(reference, farmer, &crop_name);
            let breakdown = success_breakdown(farmer, &profitability, market_demand);
            CropRecommendation {
                crop_name,
                expected_income: profitability.expected_income.round() as i64,
                demand,
                success_rate: breakdown.total,
                success_breakdown: Some(breakdown),
                profitability,
                market_data,
                land_area_hectares,
                mode: RecommendationMode::FarmerData,
            }
        }
        None => {
            let income = expected_income(
                reference,
                &crop_name,
                REFERENCE_YIELD_QUINTALS,
                PriceSource::Market,
            );
            let profitability = build_result(
                ESTIMATED_COST,
                income.expected_income,
                REFERENCE_YIELD_QUINTALS,
                income.price_per_unit,
                income.source_label,
            );
            CropRecommendation {
                crop_name,
                expected_income: profitability.expected_income.round() as i64,
                demand,
                success_rate: estimated_success_rate(market_demand),
                success_breakdown: None,
                profitability,
                market_data,
                land_area_hectares,
                mode: RecommendationMode::Estimated,
            }
        }
    }
}

/// Recommends every crop in `crops`, sorts descending by expected income and
/// keeps the first `n`.
///
/// The sort is stable: crops with equal income keep their request order.
pub fn top_n(
    reference: &ReferenceData,
    crops: &[String],
    farmer: Option<&FarmerData>,
    n: usize,
    land_area_hectares: f64,
) -> CoreResult<Vec<CropRecommendation>> {
    if crops.len() > MAX_CROPS_PER_REQUEST {
        return Err(CoreError::TooManyCrops {
            requested: crops.len(),
            max: MAX_CROPS_PER_REQUEST,
        });
    }

    let mut ranked: Vec<CropRecommendation> = crops
        .iter()
        .filter(|crop| !crop.trim().is_empty())
        .map(|crop| recommend(reference, crop, farmer, land_area_hectares))
        .collect();

    ranked.sort_by(|a, b| b.expected_income.cmp(&a.expected_income));
    ranked.truncate(n);
    Ok(ranked)
}

/// Demand reported for a crop: market demand, or MEDIUM without market data.
pub fn demand_for(reference: &ReferenceData, crop: &str) -> Demand {
    reference
        .market_entry(crop)
        .map(|entry| entry.demand)
        .unwrap_or_default()
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

    fn crops(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_farmer_mode_rice_end_to_end() {
        let reference = ReferenceData::builtin();
        let rec = recommend(&reference, "Rice", Some(&rice_farmer()), 0.6);

        assert_eq!(rec.mode, RecommendationMode::FarmerData);
        assert_eq!(rec.expected_income, 100_000);
        assert_relative_eq!(rec.profitability.profit, 27000.0);
        assert_relative_eq!(rec.profitability.roi, 36.99);
        assert_eq!(rec.demand, Demand::High);

        let breakdown = rec.success_breakdown.unwrap();
        assert_eq!(breakdown.roi, 25);
        // COMPLETED 30 + ROI 25 + yield 40/75 → 0 + HIGH 20
        assert_eq!(rec.success_rate, 75);
        assert!(rec.market_data.is_some());
    }

    #[test]
    fn test_estimated_mode_constants() {
        let reference = ReferenceData::builtin();
        let rec = recommend(&reference, "Rice", None, 1.2);

        assert_eq!(rec.mode, RecommendationMode::Estimated);
        assert!(rec.success_breakdown.is_none());
        assert_relative_eq!(rec.profitability.total_cost, 110_000.0);
        assert_relative_eq!(rec.profitability.yield_quintals, 75.0);
        // 2500/q × 75 q
        assert_eq!(rec.expected_income, 187_500);
        assert_eq!(rec.success_rate, 78);
        assert_relative_eq!(rec.land_area_hectares, 1.2);
    }

    #[test]
    fn test_estimated_mode_success_tiers() {
        let reference = ReferenceData::builtin();
        assert_eq!(recommend(&reference, "Potato", None, 0.6).success_rate, 65);
        // Wheat is only in the MSP table: priced, but no market data.
        let wheat = recommend(&reference, "Wheat", None, 0.6);
        assert_eq!(wheat.success_rate, 60);
        assert_eq!(wheat.demand, Demand::Medium);
        assert!(wheat.market_data.is_none());
        assert_eq!(wheat.expected_income, 181_875);
    }

    #[test]
    fn test_top_n_sorted_and_truncated() {
        let reference = ReferenceData::builtin();
        let list = crops(&["Cabbage", "Tur", "Rice", "Tomato", "Cotton"]);
        let ranked = top_n(&reference, &list, None, 3, 0.6).unwrap();

        assert_eq!(ranked.len(), 3);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].expected_income >= w[1].expected_income));
        assert_eq!(ranked[0].crop_name, "Tur");
        assert_eq!(ranked[1].crop_name, "Cotton");
    }

    #[test]
    fn test_top_n_larger_than_list() {
        let reference = ReferenceData::builtin();
        let list = crops(&["Rice", "Onion"]);
        assert_eq!(top_n(&reference, &list, None, 10, 0.6).unwrap().len(), 2);
        assert!(top_n(&reference, &list, None, 0, 0.6).unwrap().is_empty());
    }

    #[test]
    fn test_top_n_rejects_oversized_lists() {
        let reference = ReferenceData::builtin();
        let list = vec!["Rice".to_string(); MAX_CROPS_PER_REQUEST + 1];
        let err = top_n(&reference, &list, None, 5, 0.6).unwrap_err();
        assert!(matches!(err, CoreError::TooManyCrops { requested: 51, max: 50 }));
    }

    #[test]
    fn test_unknown_crop_ranks_last() {
        let reference = ReferenceData::builtin();
        let list = crops(&["Dragon Fruit", "Onion"]);
        let ranked = top_n(&reference, &list, None, 2, 0.6).unwrap();
        assert_eq!(ranked[1].crop_name, "Dragon Fruit");
        assert_eq!(ranked[1].expected_income, 0);
    }

    #[test]
    fn test_demand_for_defaults_to_medium() {
        let reference = ReferenceData::builtin();
        assert_eq!(demand_for(&reference, "ragi"), Demand::High);
        assert_eq!(demand_for(&reference, "Barley"), Demand::Medium);
    }
}
