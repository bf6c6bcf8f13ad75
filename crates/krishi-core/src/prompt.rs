//! # Prompt Builders
//!
//! Builds the system/user prompt pairs sent to the text generator. Building
//! a prompt is pure string work; sending it lives in `krishi-llm`.
//!
//! ```text
//! ┌──────────────────────┬─────────────┬────────────┬──────────────────────┐
//! │ Prompt               │ Temperature │ Max tokens │ Expected reply       │
//! ├──────────────────────┼─────────────┼────────────┼──────────────────────┤
//! │ insights             │     0.7     │    1500    │ insights JSON        │
//! │ operational details  │     0.5     │    1200    │ OperationalDetails   │
//! │ natural farming      │     0.6     │    2500    │ guidance JSON        │
//! └──────────────────────┴─────────────┴────────────┴──────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::{format_currency, format_percentage};
use crate::types::{CropRecommendation, FarmerData};

/// A fully rendered request for the text generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

const ADVISOR_ROLE: &str = "You are an agricultural advisor for smallholder farmers in India. \
Give practical, region-aware advice. Use rupees for money and quintals for yield.";

const JSON_ONLY: &str = "Respond with a single JSON object only. Do not add prose or code fences.";

fn push_lines(out: &mut String, lines: Vec<String>) {
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
}

fn recommendation_context(rec: &CropRecommendation) -> Vec<String> {
    let p = &rec.profitability;
    let mut lines = vec![
        format!("Crop: {}", rec.crop_name),
        format!("Land area: {} hectares", rec.land_area_hectares),
        format!("Expected income: {}", format_currency(p.expected_income)),
        format!("Total cost: {}", format_currency(p.total_cost)),
        format!("Profit: {}", format_currency(p.profit)),
        format!("ROI: {}", format_percentage(p.roi, 2)),
        format!("Success rate: {}/100", rec.success_rate),
        format!("Market demand: {}", rec.demand),
    ];
    if let Some(market) = &rec.market_data {
        lines.push(format!(
            "Market price: {} per quintal ({})",
            format_currency(market.quote.price_per_unit),
            market.quote.source_label
        ));
    } else if p.price_per_quintal > 0.0 {
        lines.push(format!(
            "Reference price: {} per quintal ({})",
            format_currency(p.price_per_quintal),
            p.price_source
        ));
    }
    lines
}

fn farmer_context(farmer: Option<&FarmerData>) -> Vec<String> {
    let Some(farmer) = farmer else {
        return Vec::new();
    };
    let fields = [
        ("Irrigation", farmer.irrigation_type.as_deref()),
        ("Soil type", farmer.soil_type.as_deref()),
        ("Location", farmer.location.as_deref()),
        ("Season", farmer.season.as_deref()),
        ("Status", farmer.status.as_deref()),
    ];
    let mut lines: Vec<String> = fields
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}: {}", label, v))
        })
        .collect();
    if !farmer.stages.is_empty() {
        let names: Vec<&str> = farmer.stages.iter().map(|s| s.name()).collect();
        lines.push(format!("Recorded stages: {}", names.join(", ")));
    }
    lines
}

/// Narrative insights for one recommendation.
pub fn insights_prompt(rec: &CropRecommendation, farmer: Option<&FarmerData>) -> Prompt {
    let mut user = String::from("Analyse this crop plan for a farmer.\n\n");
    push_lines(&mut user, recommendation_context(rec));
    push_lines(&mut user, farmer_context(farmer));
    user.push_str(
        "\nReturn JSON with keys: \"summary\" (string), \"strengths\" (string array), \
\"risks\" (string array), \"recommendations\" (string array), \
\"marketOutlook\" (string).\n",
    );
    user.push_str(JSON_ONLY);

    Prompt {
        system: ADVISOR_ROLE.to_string(),
        user,
        temperature: 0.7,
        max_tokens: 1500,
    }
}

/// Structured operational details for one recommendation.
pub fn operational_prompt(rec: &CropRecommendation, farmer: Option<&FarmerData>) -> Prompt {
    let mut user = String::from("Describe how to cultivate this crop.\n\n");
    push_lines(&mut user, recommendation_context(rec));
    push_lines(&mut user, farmer_context(farmer));
    user.push_str(
        "\nReturn JSON with exactly this shape:\n\
{\n\
  \"equipmentNeeded\": [string],\n\
  \"effortHours\": { \"setup\": number, \"maintenance\": number, \"harvesting\": number },\n\
  \"resourceRequirements\": { \"water\": string, \"fertilizers\": [string], \"pesticides\": [string] },\n\
  \"maturityTime\": number (days),\n\
  \"riskLevel\": \"Low\" | \"Medium\" | \"High\",\n\
  \"soilSuitability\": { \"rating\": \"Excellent\" | \"Good\" | \"Fair\" | \"Poor\", \"reason\": string },\n\
  \"marketAnalysis\": { \"profitMargin\": string (percentage), \"demand\": \"HIGH\" | \"MEDIUM-HIGH\" | \"MEDIUM\" | \"LOW-MEDIUM\" }\n\
}\n",
    );
    user.push_str(JSON_ONLY);

    Prompt {
        system: ADVISOR_ROLE.to_string(),
        user,
        temperature: 0.5,
        max_tokens: 1200,
    }
}

/// Zero-Budget Natural Farming guidance for a crop.
pub fn natural_farming_prompt(crop: &str, farmer: Option<&FarmerData>) -> Prompt {
    let mut user = format!(
        "Give Zero-Budget Natural Farming (ZBNF) guidance for growing {}.\n\n",
        crop.trim()
    );
    push_lines(&mut user, farmer_context(farmer));
    user.push_str(
        "\nCover Jeevamrutha and Beejamrutha preparation, mulching (Acchadana), \
Whapasa moisture management, intercropping companions, and natural pest \
control with botanical extracts.\n\
Return JSON with keys: \"overview\" (string), \"seedTreatment\" (string), \
\"soilFertility\" (string array), \"mulching\" (string), \
\"intercropping\" (string array), \"pestManagement\" (string array), \
\"transitionPlan\" (string array), \"expectedBenefits\" (string array).\n",
    );
    user.push_str(JSON_ONLY);

    Prompt {
        system: format!(
            "{} You specialise in natural farming methods that avoid chemical inputs.",
            ADVISOR_ROLE
        ),
        user,
        temperature: 0.6,
        max_tokens: 2500,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::recommend;
    use crate::reference::ReferenceData;

    fn farmer() -> FarmerData {
        FarmerData {
            irrigation_type: Some("Drip".to_string()),
            soil_type: Some("Red loam".to_string()),
            location: Some("  ".to_string()),
            ..FarmerData::default()
        }
    }

    #[test]
    fn test_insights_prompt_carries_figures() {
        let rec = recommend(&ReferenceData::builtin(), "Rice", None, 0.6);
        let prompt = insights_prompt(&rec, None);
        assert!(prompt.user.contains("Crop: Rice"));
        assert!(prompt.user.contains("Expected income: ₹1,87,500"));
        assert!(prompt.user.contains("Market demand: HIGH"));
        assert!(prompt.user.contains("Market price: ₹2,500 per quintal (Market Bangalore)"));
        assert_eq!(prompt.temperature, 0.7);
        assert_eq!(prompt.max_tokens, 1500);
    }

    #[test]
    fn test_operational_prompt_includes_farmer_context() {
        let rec = recommend(&ReferenceData::builtin(), "Brinjal", None, 0.6);
        let prompt = operational_prompt(&rec, Some(&farmer()));
        assert!(prompt.user.contains("Irrigation: Drip"));
        assert!(prompt.user.contains("Soil type: Red loam"));
        assert!(!prompt.user.contains("Location:"));
        assert!(prompt.user.contains("\"equipmentNeeded\""));
        assert_eq!(prompt.max_tokens, 1200);
    }

    #[test]
    fn test_msp_only_crop_shows_reference_price() {
        let rec = recommend(&ReferenceData::builtin(), "Wheat", None, 0.6);
        let prompt = operational_prompt(&rec, None);
        assert!(prompt.user.contains("Reference price: ₹2,425 per quintal (MSP 2025-26)"));
    }

    #[test]
    fn test_context_is_one_field_per_line() {
        let rec = recommend(&ReferenceData::builtin(), "Rice", None, 0.6);
        let prompt = insights_prompt(&rec, Some(&farmer()));
        assert!(prompt.user.contains("Crop: Rice\nLand area: 0.6 hectares\n"));
        assert!(prompt.user.contains("Irrigation: Drip\nSoil type: Red loam\n"));
    }

    #[test]
    fn test_natural_farming_prompt() {
        let prompt = natural_farming_prompt(" Ragi ", None);
        assert!(prompt.user.contains("growing Ragi."));
        assert!(prompt.user.contains("Jeevamrutha"));
        assert!(prompt.system.contains("natural farming"));
        assert_eq!(prompt.max_tokens, 2500);
    }
}
