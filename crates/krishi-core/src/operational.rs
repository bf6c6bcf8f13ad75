//! # Operational Details
//!
//! Equipment, effort, resources, risk and soil fit for a crop.
//!
//! ## Two Sources, One Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   generated JSON (untrusted) ──► coerce(raw, defaults) ──┐              │
//! │                                  every field checked     │              │
//! │                                  individually            ├──► Operational│
//! │                                                          │    Details   │
//! │   no generator / failure ──► classify(crop) ──► template ┘              │
//! │                              grain · pulse · cash crop ·                │
//! │                              oilseed · vegetable (default)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths produce an [`OperationalDetails`] with every field populated.
//! Coercion runs even when generation succeeds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::lenient::number_from_value;
use crate::money::format_percentage;
use crate::types::{
    CropRecommendation, Demand, DetailsSource, EffortHours, MarketAnalysis, OperationalDetails,
    ResourceRequirements, RiskLevel, SoilRating, SoilSuitability,
};

// =============================================================================
// Crop Category
// =============================================================================

/// Coarse crop family used to pick a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Grain,
    Pulse,
    CashCrop,
    Oilseed,
    Vegetable,
}

const GRAIN_KEYWORDS: &[&str] = &[
    "rice", "paddy", "wheat", "maize", "corn", "jowar", "sorghum", "bajra", "millet", "ragi",
    "barley",
];
const PULSE_KEYWORDS: &[&str] = &[
    "tur", "arhar", "gram", "chana", "chickpea", "moong", "urad", "lentil", "masur", "pea", "dal",
];
const CASH_CROP_KEYWORDS: &[&str] = &["cotton", "sugarcane", "jute", "tobacco", "coffee"];
const OILSEED_KEYWORDS: &[&str] = &[
    "groundnut", "peanut", "mustard", "rapeseed", "soybean", "sunflower", "sesame", "sesamum",
    "til", "safflower", "linseed", "castor",
];

/// Classifies by keyword, checked in the order grain, pulse, cash crop,
/// oilseed. Anything else is a vegetable.
///
/// Keywords match whole words of the name (a trailing plural `s` is
/// allowed), so "Peanut" is not a "pea" and "Turmeric" is not "tur".
pub fn classify(crop: &str) -> CropCategory {
    let name = crop.trim().to_lowercase();
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let hit = |keywords: &[&str]| {
        words.iter().any(|word| {
            let singular = word.strip_suffix('s').unwrap_or(*word);
            keywords.iter().any(|k| *word == *k || singular == *k)
        })
    };

    if hit(GRAIN_KEYWORDS) {
        CropCategory::Grain
    } else if hit(PULSE_KEYWORDS) {
        CropCategory::Pulse
    } else if hit(CASH_CROP_KEYWORDS) {
        CropCategory::CashCrop
    } else if hit(OILSEED_KEYWORDS) {
        CropCategory::Oilseed
    } else {
        CropCategory::Vegetable
    }
}

// =============================================================================
// Templates
// =============================================================================

struct Template {
    equipment: &'static [&'static str],
    effort: (f64, f64, f64),
    water: &'static str,
    fertilizers: &'static [&'static str],
    pesticides: &'static [&'static str],
    maturity_days: u32,
    risk: RiskLevel,
    soil: (SoilRating, &'static str),
}

static VEGETABLE: Template = Template {
    equipment: &["Tractor", "Drip Irrigation", "Sprayer", "Harvester"],
    effort: (20.0, 60.0, 40.0),
    water: "4000-5000 litres per acre per week",
    fertilizers: &["Vermicompost", "NPK 19:19:19", "Calcium nitrate"],
    pesticides: &["Neem oil", "Trichoderma", "Imidacloprid"],
    maturity_days: 90,
    risk: RiskLevel::Medium,
    soil: (SoilRating::Good, "Well-drained loamy soil suits most vegetables"),
};

static GRAIN: Template = Template {
    equipment: &["Tractor", "Seed Drill", "Combine Harvester", "Sprayer"],
    effort: (30.0, 40.0, 35.0),
    water: "1200-1500 mm per season through flood or furrow irrigation",
    fertilizers: &["Urea", "DAP", "Muriate of Potash"],
    pesticides: &["Chlorpyrifos", "Tricyclazole"],
    maturity_days: 120,
    risk: RiskLevel::Low,
    soil: (SoilRating::Good, "Clay loam with good water retention"),
};

static PULSE: Template = Template {
    equipment: &["Tractor", "Seed Drill", "Sprayer", "Thresher"],
    effort: (20.0, 30.0, 25.0),
    water: "Light irrigation at flowering and pod filling",
    fertilizers: &["Rhizobium culture", "DAP", "Gypsum"],
    pesticides: &["Neem oil", "Quinalphos"],
    maturity_days: 100,
    risk: RiskLevel::Low,
    soil: (SoilRating::Good, "Well-drained soil; waterlogging damages roots"),
};

static CASH_CROP: Template = Template {
    equipment: &["Tractor", "Sprayer", "Irrigation Pump", "Harvester"],
    effort: (40.0, 80.0, 60.0),
    water: "700-1200 mm per season with regular irrigation",
    fertilizers: &["Urea", "SSP", "Potash", "Farmyard manure"],
    pesticides: &["Bt spray", "Acephate", "Neem oil"],
    maturity_days: 180,
    risk: RiskLevel::High,
    soil: (SoilRating::Fair, "Deep black soil preferred; needs careful nutrient management"),
};

static OILSEED: Template = Template {
    equipment: &["Tractor", "Seed Drill", "Sprayer", "Thresher"],
    effort: (25.0, 35.0, 30.0),
    water: "Protective irrigation at flowering and pegging",
    fertilizers: &["Gypsum", "SSP", "Sulphur"],
    pesticides: &["Neem oil", "Mancozeb"],
    maturity_days: 110,
    risk: RiskLevel::Medium,
    soil: (SoilRating::Good, "Sandy loam with good drainage"),
};

fn template_for(category: CropCategory) -> &'static Template {
    match category {
        CropCategory::Grain => &GRAIN,
        CropCategory::Pulse => &PULSE,
        CropCategory::CashCrop => &CASH_CROP,
        CropCategory::Oilseed => &OILSEED,
        CropCategory::Vegetable => &VEGETABLE,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn from_template(template: &Template, market_analysis: MarketAnalysis, source: DetailsSource) -> OperationalDetails {
    let (setup, maintenance, harvesting) = template.effort;
    let (rating, reason) = template.soil;
    OperationalDetails {
        equipment_needed: strings(template.equipment),
        effort_hours: EffortHours {
            setup,
            maintenance,
            harvesting,
        },
        resource_requirements: ResourceRequirements {
            water: template.water.to_string(),
            fertilizers: strings(template.fertilizers),
            pesticides: strings(template.pesticides),
        },
        maturity_time: template.maturity_days,
        risk_level: template.risk,
        soil_suitability: SoilSuitability {
            rating,
            reason: reason.to_string(),
        },
        market_analysis,
        source,
    }
}

/// Market block derived from a recommendation: profit margin over expected
/// income, and the recommendation's demand.
pub fn market_analysis(recommendation: &CropRecommendation) -> MarketAnalysis {
    let p = &recommendation.profitability;
    let profit_margin = if p.expected_income > 0.0 {
        format_percentage(p.profit / p.expected_income * 100.0, 1)
    } else {
        "0%".to_string()
    };
    MarketAnalysis {
        profit_margin,
        demand: recommendation.demand,
    }
}

/// Static details for `crop`, used when no generator is available or the
/// generator fails.
pub fn template_details(crop: &str, recommendation: &CropRecommendation) -> OperationalDetails {
    from_template(
        template_for(classify(crop)),
        market_analysis(recommendation),
        DetailsSource::Template,
    )
}

// =============================================================================
// Coercion of Generated Output
// =============================================================================

/// Per-field defaults applied when generated output is missing or invalid.
///
/// | Field                         | Default                         |
/// |-------------------------------|---------------------------------|
/// | equipmentNeeded               | Tractor, Sprayer                |
/// | effortHours.*                 | 20 / 40 / 30                    |
/// | resourceRequirements.water    | "As per crop stage"             |
/// | resourceRequirements.*        | Farmyard manure / Neem oil      |
/// | maturityTime                  | 90                              |
/// | riskLevel                     | Medium                          |
/// | soilSuitability               | Good, generic reason            |
/// | marketAnalysis                | from the recommendation         |
pub fn coercion_defaults(recommendation: &CropRecommendation) -> OperationalDetails {
    OperationalDetails {
        equipment_needed: strings(&["Tractor", "Sprayer"]),
        effort_hours: EffortHours {
            setup: 20.0,
            maintenance: 40.0,
            harvesting: 30.0,
        },
        resource_requirements: ResourceRequirements {
            water: "As per crop stage".to_string(),
            fertilizers: strings(&["Farmyard manure"]),
            pesticides: strings(&["Neem oil"]),
        },
        maturity_time: 90,
        risk_level: RiskLevel::Medium,
        soil_suitability: SoilSuitability {
            rating: SoilRating::Good,
            reason: "Suitable with proper soil management".to_string(),
        },
        market_analysis: market_analysis(recommendation),
        source: DetailsSource::Generated,
    }
}

/// Longest season accepted from generated output, in days.
const MAX_MATURITY_DAYS: f64 = 730.0;

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(|item| non_empty_string(Some(item)))
        .collect();
    (!items.is_empty()).then_some(items)
}

fn positive_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(number_from_value).filter(|n| *n > 0.0)
}

fn parsed<T: std::str::FromStr>(value: Option<&Value>) -> Option<T> {
    value.and_then(Value::as_str).and_then(|s| s.parse().ok())
}

/// Validates generated details field by field. Anything missing, mistyped,
/// or outside its enum is replaced with the matching field of `defaults`.
pub fn coerce(raw: &Value, defaults: &OperationalDetails) -> OperationalDetails {
    let effort = raw.get("effortHours");
    let resources = raw.get("resourceRequirements");
    let soil = raw.get("soilSuitability");
    let market = raw.get("marketAnalysis");

    let field = |parent: Option<&Value>, key: &str| parent.and_then(|p| p.get(key)).cloned();

    let profit_margin = match field(market, "profitMargin") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|v| format_percentage(v, 1))
            .unwrap_or_else(|| defaults.market_analysis.profit_margin.clone()),
        _ => defaults.market_analysis.profit_margin.clone(),
    };

    OperationalDetails {
        equipment_needed: string_list(raw.get("equipmentNeeded"))
            .unwrap_or_else(|| defaults.equipment_needed.clone()),
        effort_hours: EffortHours {
            setup: positive_number(field(effort, "setup").as_ref())
                .unwrap_or(defaults.effort_hours.setup),
            maintenance: positive_number(field(effort, "maintenance").as_ref())
                .unwrap_or(defaults.effort_hours.maintenance),
            harvesting: positive_number(field(effort, "harvesting").as_ref())
                .unwrap_or(defaults.effort_hours.harvesting),
        },
        resource_requirements: ResourceRequirements {
            water: non_empty_string(field(resources, "water").as_ref())
                .unwrap_or_else(|| defaults.resource_requirements.water.clone()),
            fertilizers: string_list(field(resources, "fertilizers").as_ref())
                .unwrap_or_else(|| defaults.resource_requirements.fertilizers.clone()),
            pesticides: string_list(field(resources, "pesticides").as_ref())
                .unwrap_or_else(|| defaults.resource_requirements.pesticides.clone()),
        },
        maturity_time: positive_number(raw.get("maturityTime"))
            .filter(|days| *days <= MAX_MATURITY_DAYS)
            .map(|days| days.round() as u32)
            .unwrap_or(defaults.maturity_time),
        risk_level: parsed::<RiskLevel>(raw.get("riskLevel")).unwrap_or(defaults.risk_level),
        soil_suitability: SoilSuitability {
            rating: parsed::<SoilRating>(field(soil, "rating").as_ref())
                .unwrap_or(defaults.soil_suitability.rating),
            reason: non_empty_string(field(soil, "reason").as_ref())
                .unwrap_or_else(|| defaults.soil_suitability.reason.clone()),
        },
        market_analysis: MarketAnalysis {
            profit_margin,
            demand: parsed::<Demand>(field(market, "demand").as_ref())
                .unwrap_or(defaults.market_analysis.demand),
        },
        source: DetailsSource::Generated,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
