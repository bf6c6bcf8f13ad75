//! # Reference Data Tables
//!
//! Read-only price tables the pipeline resolves crops against.
//!
//! ```text
//! ┌───────────────────────────────┐   ┌───────────────────────────────────┐
//! │  MSP table (government)       │   │  APMC market table (regional)     │
//! │  crop → fiscal year → ₹/q     │   │  crop → region, demand,           │
//! │  PADDY  2023-24  2183         │   │         trade records[]           │
//! │         2024-25  2300  ◄ used │   │  RICE   Bangalore  HIGH           │
//! │                               │   │         modal 2450/2500/2550      │
//! └───────────────────────────────┘   │         → quote = mean(modal)     │
//!                                     └───────────────────────────────────┘
//! ```
//!
//! Both tables quote rupees per quintal. Entries are kept in `Vec`s so that
//! resolver iteration order is stable.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::resolver::{self, CropKeyed};
use crate::types::{Demand, MarketData, PriceQuote, PriceSource, TradeRecord};

// =============================================================================
// Table Entries
// =============================================================================

/// Minimum Support Price history for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MspEntry {
    pub crop: String,
    /// Kharif or Rabi.
    pub season: String,
    /// Fiscal year ("2024-25") → rupees per quintal.
    pub prices: BTreeMap<String, f64>,
}

impl MspEntry {
    /// The most recent fiscal year and its price. Fiscal-year labels sort
    /// chronologically as strings.
    pub fn latest(&self) -> Option<(&str, f64)> {
        self.prices
            .iter()
            .next_back()
            .map(|(year, price)| (year.as_str(), *price))
    }

    /// Quote for the most recent fiscal year.
    pub fn quote(&self) -> Option<PriceQuote> {
        self.latest().map(|(year, price)| PriceQuote {
            price_per_unit: price,
            source_label: format!("MSP {}", year),
            source_table: PriceSource::Msp,
        })
    }
}

impl CropKeyed for MspEntry {
    fn crop_key(&self) -> &str {
        &self.crop
    }
}

/// Recent APMC trade for one crop at one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    pub crop: String,
    pub region: String,
    pub demand: Demand,
    pub records: Vec<TradeRecord>,
}

impl MarketEntry {
    /// Mean modal price across the recent records. `None` without records.
    pub fn average_modal_price(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(|r| r.modal_price).sum();
        Some(sum / self.records.len() as f64)
    }

    pub fn quote(&self) -> Option<PriceQuote> {
        self.average_modal_price().map(|price| PriceQuote {
            price_per_unit: price,
            source_label: format!("Market {}", self.region),
            source_table: PriceSource::Market,
        })
    }

    pub fn market_data(&self) -> Option<MarketData> {
        self.quote().map(|quote| MarketData {
            quote,
            region: self.region.clone(),
            demand: self.demand,
            history: self.records.clone(),
        })
    }
}

impl CropKeyed for MarketEntry {
    fn crop_key(&self) -> &str {
        &self.crop
    }
}

// =============================================================================
// Reference Data
// =============================================================================

/// Both reference tables. Built once at start-up and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub msp: Vec<MspEntry>,
    pub market: Vec<MarketEntry>,
}

impl ReferenceData {
    pub fn new(msp: Vec<MspEntry>, market: Vec<MarketEntry>) -> Self {
        ReferenceData { msp, market }
    }

    pub fn msp_entry(&self, crop: &str) -> Option<&MspEntry> {
        resolver::resolve(crop, &self.msp)
    }

    pub fn market_entry(&self, crop: &str) -> Option<&MarketEntry> {
        resolver::resolve(crop, &self.market)
    }

    /// MSP quote for the most recent fiscal year.
    pub fn msp_quote(&self, crop: &str) -> Option<PriceQuote> {
        self.msp_entry(crop).and_then(MspEntry::quote)
    }

    pub fn market_quote(&self, crop: &str) -> Option<PriceQuote> {
        self.market_entry(crop).and_then(MarketEntry::quote)
    }

    pub fn market_data(&self, crop: &str) -> Option<MarketData> {
        self.market_entry(crop).and_then(MarketEntry::market_data)
    }

    /// Display names of every crop with market data, in table order. Used as
    /// the candidate list when a recommendation request names none.
    pub fn market_crops(&self) -> Vec<String> {
        self.market.iter().map(|e| e.crop.clone()).collect()
    }

    /// The tables shipped with the service: MSP for 2023-24 onwards and
    /// Karnataka APMC trade from January 2025.
    pub fn builtin() -> Self {
        ReferenceData {
            msp: builtin_msp(),
            market: builtin_market(),
        }
    }
}

// =============================================================================
// Built-in Data
// =============================================================================

fn msp(crop: &str, season: &str, prices: &[(&str, f64)]) -> MspEntry {
    MspEntry {
        crop: crop.to_string(),
        season: season.to_string(),
        prices: prices
            .iter()
            .map(|(year, price)| (year.to_string(), *price))
            .collect(),
    }
}

fn builtin_msp() -> Vec<MspEntry> {
    vec![
        msp("Paddy", "Kharif", &[("2023-24", 2183.0), ("2024-25", 2300.0)]),
        msp("Wheat", "Rabi", &[("2024-25", 2275.0), ("2025-26", 2425.0)]),
        msp("Jowar", "Kharif", &[("2023-24", 3180.0), ("2024-25", 3371.0)]),
        msp("Bajra", "Kharif", &[("2023-24", 2500.0), ("2024-25", 2625.0)]),
        msp("Ragi", "Kharif", &[("2023-24", 3846.0), ("2024-25", 4290.0)]),
        msp("Maize", "Kharif", &[("2023-24", 2090.0), ("2024-25", 2225.0)]),
        msp("Tur", "Kharif", &[("2023-24", 7000.0), ("2024-25", 7550.0)]),
        msp("Moong", "Kharif", &[("2023-24", 8558.0), ("2024-25", 8682.0)]),
        msp("Urad", "Kharif", &[("2023-24", 6950.0), ("2024-25", 7400.0)]),
        msp("Gram", "Rabi", &[("2024-25", 5440.0), ("2025-26", 5650.0)]),
        msp("Masur", "Rabi", &[("2024-25", 6425.0), ("2025-26", 6700.0)]),
        msp("Groundnut", "Kharif", &[("2023-24", 6377.0), ("2024-25", 6783.0)]),
        msp("Soybean", "Kharif", &[("2023-24", 4600.0), ("2024-25", 4892.0)]),
        msp("Sunflower", "Kharif", &[("2023-24", 6760.0), ("2024-25", 7280.0)]),
        msp("Sesamum", "Kharif", &[("2023-24", 8635.0), ("2024-25", 9267.0)]),
        msp("Rapeseed & Mustard", "Rabi", &[("2024-25", 5650.0), ("2025-26", 5950.0)]),
        msp("Cotton", "Kharif", &[("2023-24", 6620.0), ("2024-25", 7121.0)]),
        msp("Barley", "Rabi", &[("2024-25", 1850.0), ("2025-26", 1980.0)]),
        msp("Safflower", "Rabi", &[("2024-25", 5800.0), ("2025-26", 5940.0)]),
    ]
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap_or_default()
}

fn market(crop: &str, region: &str, demand: Demand, modal: [(f64, f64, f64, f64); 3]) -> MarketEntry {
    MarketEntry {
        crop: crop.to_string(),
        region: region.to_string(),
        demand,
        records: modal
            .iter()
            .zip(13..)
            .map(|(&(min_price, max_price, modal_price, arrivals), d)| TradeRecord {
                date: day(d),
                min_price,
                max_price,
                modal_price,
                arrivals,
            })
            .collect(),
    }
}

fn builtin_market() -> Vec<MarketEntry> {
    use Demand::*;
    vec![
        market("Rice", "Bangalore", High, [
            (2300.0, 2600.0, 2450.0, 120.0),
            (2350.0, 2650.0, 2500.0, 135.0),
            (2400.0, 2700.0, 2550.0, 110.0),
        ]),
        market("Tomato", "Kolar", High, [
            (1200.0, 2400.0, 1800.0, 640.0),
            (1400.0, 2600.0, 2000.0, 580.0),
            (1600.0, 2800.0, 2200.0, 520.0),
        ]),
        market("Onion", "Bangalore", MediumHigh, [
            (2000.0, 2800.0, 2400.0, 900.0),
            (2200.0, 3000.0, 2600.0, 850.0),
            (2100.0, 2900.0, 2500.0, 870.0),
        ]),
        market("Potato", "Bangalore", Medium, [
            (1300.0, 1700.0, 1500.0, 400.0),
            (1400.0, 1800.0, 1600.0, 380.0),
            (1500.0, 1900.0, 1700.0, 360.0),
        ]),
        market("Brinjal", "Mysore", Medium, [
            (1000.0, 2000.0, 1500.0, 45.0),
            (1200.0, 2200.0, 1800.0, 40.0),
            (1100.0, 2100.0, 1650.0, 42.0),
        ]),
        market("Maize", "Davangere", MediumHigh, [
            (2050.0, 2250.0, 2150.0, 700.0),
            (2100.0, 2300.0, 2200.0, 650.0),
            (2150.0, 2350.0, 2250.0, 620.0),
        ]),
        market("Ragi", "Mandya", High, [
            (3700.0, 4100.0, 3900.0, 90.0),
            (3800.0, 4200.0, 4000.0, 85.0),
            (3900.0, 4300.0, 4100.0, 80.0),
        ]),
        market("Groundnut", "Chitradurga", Medium, [
            (5800.0, 6600.0, 6200.0, 150.0),
            (6000.0, 6800.0, 6400.0, 140.0),
            (5900.0, 6700.0, 6300.0, 145.0),
        ]),
        market("Cotton", "Raichur", MediumHigh, [
            (6700.0, 7300.0, 7000.0, 300.0),
            (6900.0, 7500.0, 7200.0, 280.0),
            (6800.0, 7400.0, 7100.0, 290.0),
        ]),
        market("Tur", "Kalaburagi", High, [
            (9000.0, 10000.0, 9500.0, 210.0),
            (9300.0, 10300.0, 9800.0, 190.0),
            (9150.0, 10150.0, 9650.0, 200.0),
        ]),
        market("Cabbage", "Kolar", LowMedium, [
            (600.0, 1000.0, 800.0, 300.0),
            (700.0, 1100.0, 900.0, 320.0),
            (800.0, 1200.0, 1000.0, 310.0),
        ]),
        market("Green Chilli", "Bangalore", High, [
            (2400.0, 3200.0, 2800.0, 60.0),
            (2800.0, 3600.0, 3200.0, 55.0),
            (2600.0, 3400.0, 3000.0, 58.0),
        ]),
        market("Beans", "Bangalore", Medium, [
            (2600.0, 3400.0, 3000.0, 70.0),
            (3000.0, 3800.0, 3400.0, 65.0),
            (2800.0, 3600.0, 3200.0, 68.0),
        ]),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
