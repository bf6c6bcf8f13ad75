//! # Cache Keys
//!
//! `"<prefix>:<first 16 hex chars of SHA-256(canonical JSON)>"`
//!
//! Canonical JSON sorts object keys at every depth, so the same parameters
//! always produce the same key whatever order they arrived in.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in the key.
pub const HASH_LEN: usize = 16;

/// Rebuilds `value` with object keys sorted recursively. Array order is
/// significant and kept.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Deterministic key for memoizing a call with `params`.
pub fn cache_key(prefix: &str, params: &Value) -> String {
    let canonical = canonicalize(params).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    let hash = hex::encode(digest);
    format!("{}:{}", prefix, &hash[..HASH_LEN])
}

// =============================================================================
// Unit Tests
// =============================================================================
