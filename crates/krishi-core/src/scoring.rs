//! # Success-Rate Scorer
//!
//! A weighted heuristic producing a 0-100 score. The four factors are scored
//! independently and summed, then clamped to 100.
//!
//! ```text
//! ┌──────────────────────┬────────┬──────────────────────────────────────────┐
//! │ Factor               │ Weight │ Tiers                                    │
//! ├──────────────────────┼────────┼──────────────────────────────────────────┤
//! │ Completion status    │   30   │ COMPLETED 30 · IN_PROGRESS 15 · else 0   │
//! │ ROI (%)              │   30   │ >50 30 · >30 25 · >10 15 · >0 10 · else 0│
//! │ Yield ratio (÷ 75 q) │   20   │ ≥1 20 · ≥0.8 15 · ≥0.6 10 · else 0       │
//! │ Market demand        │   20   │ HIGH 20 · MED-HIGH 15 · MED 10 ·         │
//! │                      │        │ no data 10 · LOW-MED 0                   │
//! └──────────────────────┴────────┴──────────────────────────────────────────┘
//! ```
//!
//! The weights and thresholds are calibration constants with no recorded
//! derivation. They are user-facing, so they are kept exactly.

use crate::types::{CompletionStatus, Demand, FarmerData, ProfitabilityResult, SuccessBreakdown};
use crate::REFERENCE_YIELD_QUINTALS;

pub const COMPLETION_WEIGHT: u8 = 30;
pub const ROI_WEIGHT: u8 = 30;
pub const YIELD_WEIGHT: u8 = 20;
pub const DEMAND_WEIGHT: u8 = 20;

/// Estimation-mode scores used when there is no farmer record.
pub const ESTIMATED_SCORE_HIGH_DEMAND: u8 = 78;
pub const ESTIMATED_SCORE_OTHER_DEMAND: u8 = 65;
pub const ESTIMATED_SCORE_NO_MARKET: u8 = 60;

pub fn completion_score(status: CompletionStatus) -> u8 {
    match status {
        CompletionStatus::Completed => COMPLETION_WEIGHT,
        CompletionStatus::InProgress => 15,
        CompletionStatus::Other => 0,
    }
}

pub fn roi_score(roi: f64) -> u8 {
    if roi > 50.0 {
        ROI_WEIGHT
    } else if roi > 30.0 {
        25
    } else if roi > 10.0 {
        15
    } else if roi > 0.0 {
        10
    } else {
        0
    }
}

pub fn yield_score(yield_quintals: f64) -> u8 {
    let ratio = yield_quintals / REFERENCE_YIELD_QUINTALS;
    if ratio >= 1.0 {
        YIELD_WEIGHT
    } else if ratio >= 0.8 {
        15
    } else if ratio >= 0.6 {
        10
    } else {
        0
    }
}

/// `None` means no market data: scored as neutral.
pub fn demand_score(demand: Option<Demand>) -> u8 {
    match demand {
        Some(Demand::High) => DEMAND_WEIGHT,
        Some(Demand::MediumHigh) => 15,
        Some(Demand::Medium) => 10,
        None => 10,
        Some(Demand::LowMedium) => 0,
    }
}

/// Scores a farmer record against its profitability and market demand.
pub fn success_breakdown(
    farmer: &FarmerData,
    profitability: &ProfitabilityResult,
    demand: Option<Demand>,
) -> SuccessBreakdown {
    let completion = completion_score(farmer.completion_status());
    let roi = roi_score(profitability.roi);
    let yield_ratio = yield_score(profitability.yield_quintals);
    let demand = demand_score(demand);
    let total = (completion + roi + yield_ratio + demand).min(100);

    SuccessBreakdown {
        completion,
        roi,
        yield_ratio,
        demand,
        total,
    }
}

/// The 0-100 success rate.
pub fn success_rate(
    farmer: &FarmerData,
    profitability: &ProfitabilityResult,
    demand: Option<Demand>,
) -> u8 {
    success_breakdown(farmer, profitability, demand).total
}

/// Coarse score used in estimation mode.
pub fn estimated_success_rate(demand: Option<Demand>) -> u8 {
    match demand {
        Some(Demand::High) => ESTIMATED_SCORE_HIGH_DEMAND,
        Some(_) => ESTIMATED_SCORE_OTHER_DEMAND,
        None => ESTIMATED_SCORE_NO_MARKET,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
