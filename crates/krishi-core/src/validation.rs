//! # Validation Module
//!
//! Request-body checks that run before any computation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end form                                               │
//! │  └── Required inputs, numeric fields                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: advisor-api handler                                          │
//! │  ├── THIS MODULE: required fields, topN, land area, crop list          │
//! │  └── 400 envelope naming every missing field                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Lenient deserialization of farmer data                       │
//! │  └── Malformed nested values degrade to zero, never fail               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use krishi_core::validation::require_fields;
//! use serde_json::json;
//!
//! let body = json!({ "cropName": "Rice", "farmerData": null });
//! let err = require_fields(&body, &["cropName", "farmerData"]).unwrap_err();
//! assert_eq!(err.to_string(), "Missing required field(s): farmerData");
//! ```

use serde_json::Value;

use crate::error::ValidationError;
use crate::MAX_CROPS_PER_REQUEST;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest land holding accepted, in hectares.
pub const MAX_LAND_AREA_HECTARES: f64 = 10_000.0;

/// Longest crop name accepted.
pub const MAX_CROP_NAME_LEN: usize = 100;

// =============================================================================
// Required Fields
// =============================================================================

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Checks that every field in `fields` is present, non-null and, for
/// strings, non-blank. All missing fields are reported together.
pub fn require_fields(body: &Value, fields: &[&str]) -> ValidationResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|field| is_missing(body.get(**field)))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a crop name and returns it trimmed.
pub fn validate_crop_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::MissingFields {
            fields: vec!["cropName".to_string()],
        });
    }

    if name.chars().count() > MAX_CROP_NAME_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "cropName".to_string(),
            reason: format!("must be at most {} characters", MAX_CROP_NAME_LEN),
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the requested number of recommendations.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed MAX_CROPS_PER_REQUEST (50)
pub fn validate_top_n(n: i64) -> ValidationResult<usize> {
    if n <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "topN".to_string(),
        });
    }

    if n > MAX_CROPS_PER_REQUEST as i64 {
        return Err(ValidationError::OutOfRange {
            field: "topN".to_string(),
            min: 1.0,
            max: MAX_CROPS_PER_REQUEST as f64,
        });
    }

    Ok(n as usize)
}

/// Validates a land area in hectares.
pub fn validate_land_area(hectares: f64) -> ValidationResult<f64> {
    if !hectares.is_finite() || hectares <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "landArea".to_string(),
        });
    }

    if hectares > MAX_LAND_AREA_HECTARES {
        return Err(ValidationError::OutOfRange {
            field: "landArea".to_string(),
            min: 0.0,
            max: MAX_LAND_AREA_HECTARES,
        });
    }

    Ok(hectares)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Reads a list of crop names. Blank entries are dropped.
///
/// ## Rules
/// - Must be an array of strings
/// - Must not exceed MAX_CROPS_PER_REQUEST (50) entries
pub fn validate_crop_list(value: &Value) -> ValidationResult<Vec<String>> {
    let items = value.as_array().ok_or_else(|| ValidationError::InvalidFormat {
        field: "crops".to_string(),
        reason: "must be an array of crop names".to_string(),
    })?;

    if items.len() > MAX_CROPS_PER_REQUEST {
        return Err(ValidationError::OutOfRange {
            field: "crops".to_string(),
            min: 0.0,
            max: MAX_CROPS_PER_REQUEST as f64,
        });
    }

    let mut crops = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or_else(|| ValidationError::InvalidFormat {
            field: "crops".to_string(),
            reason: "must be an array of crop names".to_string(),
        })?;
        if !name.trim().is_empty() {
            crops.push(validate_crop_name(name)?);
        }
    }

    Ok(crops)
}

// =============================================================================
// Unit Tests
// =============================================================================
