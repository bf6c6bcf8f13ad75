//! # krishi-core: Pure Business Logic for Krishi Advisor
//!
//! This crate is the **heart** of Krishi Advisor. It contains the crop
//! profitability and recommendation pipeline as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Krishi Advisor Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    advisor-api (axum)                            │   │
//! │  │   /recommendations  /profitability  /insights  /natural-farming │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ krishi-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  reference ──► resolver ──► aggregate ──► profitability         │   │
//! │  │                                               │                 │   │
//! │  │                    scoring ◄──────────────────┘                 │   │
//! │  │                       │                                         │   │
//! │  │                       ▼                                         │   │
//! │  │               recommendation ──► operational / prompt           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO REDIS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │         ┌──────────────────────┴──────────────────────┐                │
//! │  ┌──────▼───────┐                              ┌──────▼───────┐        │
//! │  │ krishi-cache │                              │  krishi-llm  │        │
//! │  │    Redis     │                              │   reqwest    │        │
//! │  └──────────────┘                              └──────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Farmer input and response types
//! - [`reference`] - MSP and APMC market reference tables
//! - [`resolver`] - Free-text crop name → table entry
//! - [`aggregate`] - Cost totals, cost breakdown, expected income
//! - [`profitability`] - Profit, ROI, profit per quintal
//! - [`scoring`] - Weighted success-rate heuristic
//! - [`recommendation`] - Per-crop recommendations and top-N ranking
//! - [`operational`] - Category templates and coercion of generated details
//! - [`prompt`] - Prompts sent to the text generator
//! - [`parse`] - Pulling JSON out of generated text
//! - [`cache_key`] - Deterministic cache keys
//! - [`money`] - Rupee and percentage formatting
//! - [`validation`] - Required-field checks for request bodies
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use krishi_core::reference::ReferenceData;
//! use krishi_core::recommendation::recommend;
//!
//! let reference = ReferenceData::builtin();
//! let rec = recommend(&reference, "Rice", None, 0.6);
//!
//! // No farmer data: estimation mode with the 75 quintal reference yield
//! assert!(rec.expected_income > 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod cache_key;
pub mod error;
pub mod money;
pub mod operational;
pub mod parse;
pub mod profitability;
pub mod prompt;
pub mod recommendation;
pub mod reference;
pub mod resolver;
pub mod scoring;
pub mod types;
pub mod validation;

mod lenient;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use reference::ReferenceData;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Kilograms per quintal. Both price tables quote rupees per quintal.
pub const KG_PER_QUINTAL: f64 = 100.0;

/// Yield assumed when the farmer record has none (the reference sample size).
pub const DEFAULT_YIELD_KG: f64 = 7500.0;

/// Reference yield used for the yield-ratio tier and for estimation mode.
pub const REFERENCE_YIELD_QUINTALS: f64 = 75.0;

/// Cultivation cost assumed in estimation mode.
pub const ESTIMATED_COST: f64 = 110_000.0;

/// Land area assumed when the request does not name one.
pub const DEFAULT_LAND_AREA_HECTARES: f64 = 0.6;

/// Number of recommendations returned when the request does not name one.
pub const DEFAULT_TOP_N: usize = 5;

/// Upper bound on the crop list of a single recommendation request.
pub const MAX_CROPS_PER_REQUEST: usize = 50;

/// Rounds to two decimal places (ROI and per-quintal figures).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
