//! # Money Module
//!
//! Display formatting for rupee amounts and percentages.
//!
//! ## Raw Numbers Inside, Strings at the Edge
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  aggregate / profitability          advisor-api response                │
//! │  ───────────────────────────        ─────────────────────────────────   │
//! │  expected_income = 187500.0   ──►   "expectedIncome": 187500            │
//! │                                     "formatted": { "expectedIncome":    │
//! │                                                    "₹1,87,500" }        │
//! │                                                                         │
//! │  Only the response layer converts to strings. Computation never         │
//! │  round-trips through a formatted value.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Indian Digit Grouping
//! The last three digits form one group, every group above that has two:
//! `12,34,56,789`, not `123,456,789`.
//!
//! ```rust
//! use krishi_core::money::format_currency;
//!
//! assert_eq!(format_currency(123456.7), "₹1,23,457");
//! assert_eq!(format_currency(-5000.0), "-₹5,000");
//! ```

// =============================================================================
// Formatting Helpers
// =============================================================================

fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Integer-rounded rupee string with Indian grouping, e.g. `₹1,23,457`.
/// Non-finite input is shown as `₹0`.
pub fn format_currency(amount: f64) -> String {
    let rupees = if amount.is_finite() { amount.round() as i64 } else { 0 };
    let sign = if rupees < 0 { "-" } else { "" };
    format!("{}₹{}", sign, group_indian(rupees.unsigned_abs()))
}

/// Percentage string with a fixed number of decimals, e.g. `36.99%`.
/// Non-finite input is shown as `0%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.*}%", decimals, value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
        assert_eq!(format_currency(73000.0), "₹73,000");
        assert_eq!(format_currency(100000.0), "₹1,00,000");
        assert_eq!(format_currency(123456789.0), "₹12,34,56,789");
    }

    #[test]
    fn test_rounds_to_whole_rupees() {
        assert_eq!(format_currency(1499.5), "₹1,500");
        assert_eq!(format_currency(1499.49), "₹1,499");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(-27000.0), "-₹27,000");
        assert_eq!(format_currency(-0.4), "₹0");
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(format_currency(f64::NAN), "₹0");
        assert_eq!(format_percentage(f64::INFINITY, 2), "0%");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(36.986, 2), "36.99%");
        assert_eq!(format_percentage(27.0, 1), "27.0%");
        assert_eq!(format_percentage(-100.0, 2), "-100.00%");
    }
}
