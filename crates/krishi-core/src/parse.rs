//! # Generated Text Parsing
//!
//! Pulls a JSON object out of free-form generator output.
//!
//! ```text
//! "Here is the analysis:\n```json\n{ \"a\": \"}\" }\n```\nHope it helps"
//!                               │
//!            strip_code_fences  ▼
//! "Here is the analysis:\n{ \"a\": \"}\" }\nHope it helps"
//!                               │
//!         extract_json_object   ▼   (brace depth, string and escape aware)
//! "{ \"a\": \"}\" }"
//!                               │
//!                 serde_json    ▼
//! Object { a: "}" }
//! ```
//!
//! When no object can be parsed the raw text is kept under a caller-chosen
//! key (`rawInsights`, `rawAnalysis`) instead of being discarded.

use serde_json::{Map, Value};

/// Key used for unparseable insight text.
pub const RAW_INSIGHTS_KEY: &str = "rawInsights";

/// Key used for unparseable analysis text.
pub const RAW_ANALYSIS_KEY: &str = "rawAnalysis";

/// Removes Markdown code-fence lines (```` ``` ```` and ```` ```json ````).
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Returns the first balanced `{ ... }` substring of `text`.
///
/// Braces inside JSON strings are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the first JSON object in generated text, tolerating code fences
/// and surrounding prose.
pub fn parse_generated_json(text: &str) -> Option<Map<String, Value>> {
    let stripped = strip_code_fences(text);
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&stripped) {
        return Some(map);
    }
    let candidate = extract_json_object(&stripped)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parsed object, or `{ <raw_key>: <original text> }` when parsing fails.
pub fn parse_or_raw(text: &str, raw_key: &str) -> Value {
    match parse_generated_json(text) {
        Some(map) => Value::Object(map),
        None => {
            let mut map = Map::new();
            map.insert(raw_key.to_string(), Value::String(text.trim().to_string()));
            Value::Object(map)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_code_fences() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let text = r#"Sure! {"note": "use {neem} oil", "quote": "say \"}\""} trailing"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"note": "use {neem} oil", "quote": "say \"}\""}"#)
        );
    }

    #[test]
    fn test_extract_first_of_two_objects() {
        assert_eq!(extract_json_object(r#"{"a":{"b":1}} {"c":2}"#), Some(r#"{"a":{"b":1}}"#));
    }

    #[test]
    fn test_extract_unbalanced() {
        assert_eq!(extract_json_object("{\"a\": 1"), None);
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn test_parse_generated_json_with_prose_and_fences() {
        let text = "Here is the analysis:\n```json\n{\"riskLevel\": \"Low\"}\n```\nHope it helps!";
        let map = parse_generated_json(text).unwrap();
        assert_eq!(map["riskLevel"], json!("Low"));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_generated_json("[1, 2, 3]").is_none());
        assert!(parse_generated_json("{not json}").is_none());
    }

    #[test]
    fn test_parse_or_raw_keeps_text() {
        let value = parse_or_raw("  The soil is fine.  ", RAW_INSIGHTS_KEY);
        assert_eq!(value, json!({ "rawInsights": "The soil is fine." }));

        let value = parse_or_raw("{\"summary\": \"ok\"}", RAW_ANALYSIS_KEY);
        assert_eq!(value, json!({ "summary": "ok" }));
    }
}
