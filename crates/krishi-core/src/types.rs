//! # Domain Types
//!
//! Core domain types used throughout Krishi Advisor.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (farmer-submitted, lenient)                                      │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   FarmerData    │──►│   CropStage     │──►│  CostCategory   │       │
//! │  │  status, yield  │   │  stageName      │   │  category       │       │
//! │  │  stages[]       │   │  categories[]   │   │  data.totalCost │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  OUTPUT (derived per request, never stored)                            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │CropRecommendation──►│ Profitability   │   │OperationalDetails│      │
//! │  │  demand         │   │  Result         │   │  equipment, risk │      │
//! │  │  successRate    │   │  roi, profit    │   │  soil, market    │      │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All JSON field names are camelCase to match the front-end.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::lenient;
use crate::{DEFAULT_YIELD_KG, KG_PER_QUINTAL};

// =============================================================================
// Farmer Input
// =============================================================================

/// Cost details recorded against one category of one stage.
///
/// Only `totalCost` feeds the aggregation; the remaining fields are carried
/// for display and for prompt context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostData {
    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub days: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub persons: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub wage_per_day: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub equipment_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub cost_per_day: Option<f64>,
}

/// A labeled cost entry within a stage, e.g. `labour_cost` or `seed_cost`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCategory {
    #[serde(default, deserialize_with = "lenient::opt_value")]
    pub category: Option<String>,

    /// Malformed `data` deserializes to `None` and contributes zero cost.
    #[serde(default, deserialize_with = "lenient::opt_value")]
    pub data: Option<CostData>,
}

impl CostCategory {
    /// Cost of this entry, zero when absent or negative.
    pub fn cost(&self) -> f64 {
        self.data
            .as_ref()
            .and_then(|d| d.total_cost)
            .filter(|c| *c > 0.0)
            .unwrap_or(0.0)
    }
}

/// One phase of cultivation (land preparation, sowing, harvesting, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropStage {
    #[serde(default, deserialize_with = "lenient::opt_value")]
    pub stage_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub categories: Vec<CostCategory>,
}

impl CropStage {
    /// Creates a stage with the given name and per-category costs.
    pub fn with_costs(name: impl Into<String>, costs: &[(&str, f64)]) -> Self {
        CropStage {
            stage_name: Some(name.into()),
            categories: costs
                .iter()
                .map(|(category, cost)| CostCategory {
                    category: Some(category.to_string()),
                    data: Some(CostData {
                        total_cost: Some(*cost),
                        ..CostData::default()
                    }),
                })
                .collect(),
        }
    }

    /// Display name, falling back to "Unnamed stage".
    pub fn name(&self) -> &str {
        self.stage_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unnamed stage")
    }
}

/// A farmer's cultivation record for one crop.
///
/// Every field is optional: absent data degrades to documented defaults
/// rather than failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerData {
    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,

    /// COMPLETED, IN_PROGRESS, PLANNED, ... (free text, case-insensitive).
    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub stages: Vec<CropStage>,

    /// Harvested (or expected) yield in kilograms.
    #[serde(
        rename = "yield",
        alias = "yieldKg",
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub yield_kg: Option<f64>,

    /// Income the farmer actually reported, if any.
    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing_if = "Option::is_none")]
    pub actual_income: Option<f64>,

    #[serde(
        alias = "landArea",
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub land_area_hectares: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_value", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

impl FarmerData {
    /// Yield converted to quintals. Missing or non-positive yield falls back
    /// to the 7500 kg reference sample.
    pub fn yield_quintals(&self) -> f64 {
        self.yield_kg
            .filter(|kg| *kg > 0.0)
            .unwrap_or(DEFAULT_YIELD_KG)
            / KG_PER_QUINTAL
    }

    /// Completion status parsed from the free-text `status` field.
    pub fn completion_status(&self) -> CompletionStatus {
        self.status
            .as_deref()
            .map(CompletionStatus::from_label)
            .unwrap_or(CompletionStatus::Other)
    }
}

/// Cultivation progress as far as the success-rate scorer is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    InProgress,
    Other,
}

impl CompletionStatus {
    /// Parses `COMPLETED`, `in_progress`, `In Progress`, `in-progress`, ...
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "COMPLETED" => CompletionStatus::Completed,
            "IN_PROGRESS" => CompletionStatus::InProgress,
            _ => CompletionStatus::Other,
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Which reference table a price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceSource {
    /// Government Minimum Support Price.
    Msp,
    /// Regional APMC market trade average.
    Market,
}

impl Default for PriceSource {
    fn default() -> Self {
        PriceSource::Market
    }
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MSP" => Ok(PriceSource::Msp),
            "MARKET" | "APMC" => Ok(PriceSource::Market),
            other => Err(format!("Unknown price source: '{}'", other)),
        }
    }
}

/// The resolved price for a crop. Exactly one table supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Rupees per quintal.
    pub price_per_unit: f64,
    /// "MSP 2024-25" or "Market Bangalore".
    pub source_label: String,
    pub source_table: PriceSource,
}

/// Market demand level attached to an APMC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Demand {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM-HIGH")]
    MediumHigh,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW-MEDIUM")]
    LowMedium,
}

impl Default for Demand {
    fn default() -> Self {
        Demand::Medium
    }
}

impl Demand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Demand::High => "HIGH",
            Demand::MediumHigh => "MEDIUM-HIGH",
            Demand::Medium => "MEDIUM",
            Demand::LowMedium => "LOW-MEDIUM",
        }
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Demand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "HIGH" => Ok(Demand::High),
            "MEDIUM-HIGH" => Ok(Demand::MediumHigh),
            "MEDIUM" => Ok(Demand::Medium),
            "LOW-MEDIUM" => Ok(Demand::LowMedium),
            other => Err(format!("Unknown demand level: '{}'", other)),
        }
    }
}

/// One day of trading for a crop at a regional market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Rupees per quintal.
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    /// Arrivals in tonnes.
    pub arrivals: f64,
}

/// Market quote plus the trade history it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub quote: PriceQuote,
    pub region: String,
    pub demand: Demand,
    pub history: Vec<TradeRecord>,
}

// =============================================================================
// Profitability
// =============================================================================

/// Derived profitability figures for one crop. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityResult {
    pub total_cost: f64,
    pub expected_income: f64,
    pub actual_income: Option<f64>,
    pub profit: f64,
    /// Percent, two decimals. Zero when total cost is zero.
    pub roi: f64,
    pub profit_per_unit_yield: f64,
    /// Stage name → summed cost. Zero-cost stages are omitted.
    pub cost_breakdown: BTreeMap<String, f64>,
    pub yield_quintals: f64,
    /// Zero means no pricing data was found, not a free crop.
    pub price_per_quintal: f64,
    pub price_source: String,
}

// =============================================================================
// Success Rate
// =============================================================================

/// The four additive sub-scores behind a success rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBreakdown {
    pub completion: u8,
    pub roi: u8,
    pub yield_ratio: u8,
    pub demand: u8,
    pub total: u8,
}

// =============================================================================
// Recommendation
// =============================================================================

/// How a recommendation's figures were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Computed from the farmer's recorded stages and yield.
    FarmerData,
    /// Projected from fixed reference constants ("what if" queries).
    Estimated,
}

/// The externally visible recommendation for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop_name: String,
    /// Rounded to whole rupees.
    pub expected_income: i64,
    pub demand: Demand,
    pub success_rate: u8,
    /// Present only in farmer-data mode.
    pub success_breakdown: Option<SuccessBreakdown>,
    pub profitability: ProfitabilityResult,
    pub market_data: Option<MarketData>,
    pub land_area_hectares: f64,
    pub mode: RecommendationMode,
}

// =============================================================================
// Operational Details
// =============================================================================

/// Cultivation risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" | "moderate" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("Unknown risk level: '{}'", other)),
        }
    }
}

/// How well the farmer's soil suits the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SoilRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl FromStr for SoilRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(SoilRating::Excellent),
            "good" => Ok(SoilRating::Good),
            "fair" | "average" => Ok(SoilRating::Fair),
            "poor" => Ok(SoilRating::Poor),
            other => Err(format!("Unknown soil rating: '{}'", other)),
        }
    }
}

/// Labour hours split across the season. Each value is positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EffortHours {
    pub setup: f64,
    pub maintenance: f64,
    pub harvesting: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    /// Free-text water volume, e.g. "4000-5000 litres per acre per week".
    pub water: String,
    pub fertilizers: Vec<String>,
    pub pesticides: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SoilSuitability {
    pub rating: SoilRating,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    /// Percentage string, e.g. "24.5%".
    pub profit_margin: String,
    pub demand: Demand,
}

/// Where a set of operational details came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DetailsSource {
    /// Generated, then validated field by field.
    Generated,
    /// Static category template.
    Template,
}

/// Non-financial cultivation metadata for a crop. Every field is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OperationalDetails {
    pub equipment_needed: Vec<String>,
    pub effort_hours: EffortHours,
    pub resource_requirements: ResourceRequirements,
    /// Days from sowing to harvest.
    pub maturity_time: u32,
    pub risk_level: RiskLevel,
    pub soil_suitability: SoilSuitability,
    pub market_analysis: MarketAnalysis,
    pub source: DetailsSource,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_farmer_data_tolerates_malformed_fields() {
        let farmer: FarmerData = serde_json::from_value(json!({
            "status": "COMPLETED",
            "yield": "4000",
            "stages": [
                { "stageName": "Sowing", "categories": [
                    { "category": "seed_cost", "data": { "totalCost": 5000 } },
                    { "category": "labour_cost", "data": "oops" },
                    { "category": "misc", "data": { "totalCost": "abc" } }
                ]},
                "not a stage"
            ]
        }))
        .unwrap();

        assert_eq!(farmer.yield_kg, Some(4000.0));
        assert_eq!(farmer.stages.len(), 1);
        assert_eq!(farmer.stages[0].categories[0].cost(), 5000.0);
        assert_eq!(farmer.stages[0].categories[1].cost(), 0.0);
        assert_eq!(farmer.stages[0].categories[2].cost(), 0.0);
    }

    #[test]
    fn test_stages_not_an_array() {
        let farmer: FarmerData =
            serde_json::from_value(json!({ "stages": { "a": 1 } })).unwrap();
        assert!(farmer.stages.is_empty());
    }

    #[test]
    fn test_yield_quintals_default() {
        let farmer = FarmerData::default();
        assert_eq!(farmer.yield_quintals(), 75.0);

        let farmer = FarmerData {
            yield_kg: Some(0.0),
            ..FarmerData::default()
        };
        assert_eq!(farmer.yield_quintals(), 75.0);

        let farmer = FarmerData {
            yield_kg: Some(4200.0),
            ..FarmerData::default()
        };
        assert_eq!(farmer.yield_quintals(), 42.0);
    }

    #[test]
    fn test_completion_status_labels() {
        assert_eq!(CompletionStatus::from_label("COMPLETED"), CompletionStatus::Completed);
        assert_eq!(CompletionStatus::from_label("in progress"), CompletionStatus::InProgress);
        assert_eq!(CompletionStatus::from_label("In-Progress"), CompletionStatus::InProgress);
        assert_eq!(CompletionStatus::from_label("PLANNED"), CompletionStatus::Other);
    }

    #[test]
    fn test_demand_serde_names() {
        assert_eq!(serde_json::to_value(Demand::MediumHigh).unwrap(), json!("MEDIUM-HIGH"));
        assert_eq!("low_medium".parse::<Demand>().unwrap(), Demand::LowMedium);
        assert!("VERY HIGH".parse::<Demand>().is_err());
    }

    #[test]
    fn test_price_source_serde() {
        assert_eq!(serde_json::to_value(PriceSource::Msp).unwrap(), json!("MSP"));
        assert_eq!("apmc".parse::<PriceSource>().unwrap(), PriceSource::Market);
    }
}
