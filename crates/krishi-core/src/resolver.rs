//! # Crop Name Resolver
//!
//! Maps a free-text crop name onto a reference-table entry.
//!
//! ## Matching Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input "  baingan "                                                     │
//! │       │  trim + upper-case                                              │
//! │       ▼                                                                 │
//! │  "BAINGAN"                                                              │
//! │       │                                                                 │
//! │       ├── 1. exact key match?            BRINJAL ≠ BAINGAN              │
//! │       │                                                                 │
//! │       └── 2. table order, first hit wins:                               │
//! │              key contains input / input contains key                    │
//! │              alias contains input / input contains alias                │
//! │              BRINJAL → aliases [EGGPLANT, BAINGAN, BADANE] ✓            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first acceptable match wins, not the best one. Two crops whose keys or
//! aliases share a substring can collide (input "GRAM" only lands on the Gram
//! entry because exact key matches are tried first). Callers may depend on the
//! loose behaviour for names outside the alias list, so it is kept as is.

/// Anything that can be looked up by crop name.
pub trait CropKeyed {
    /// Canonical crop name of the entry (any case).
    fn crop_key(&self) -> &str;
}

/// Curated aliases per canonical key: local names, synonyms, spellings.
const ALIASES: &[(&str, &[&str])] = &[
    ("PADDY", &["RICE", "DHAN", "CHAWAL"]),
    ("RICE", &["PADDY", "DHAN", "CHAWAL"]),
    ("WHEAT", &["GEHUN", "GEHU"]),
    ("JOWAR", &["SORGHUM", "JOLA"]),
    ("BAJRA", &["PEARL MILLET", "SAJJE"]),
    ("RAGI", &["FINGER MILLET", "NACHNI"]),
    ("MAIZE", &["CORN", "MAKKA", "MAKKAI"]),
    ("TUR", &["ARHAR", "TOOR", "PIGEON PEA", "RED GRAM"]),
    ("MOONG", &["GREEN GRAM", "MUNG"]),
    ("URAD", &["BLACK GRAM"]),
    ("GRAM", &["CHANA", "BENGAL GRAM", "CHICKPEA"]),
    ("MASUR", &["LENTIL", "MASOOR"]),
    ("GROUNDNUT", &["PEANUT", "MOONGPHALI", "SHENGA"]),
    ("SOYBEAN", &["SOYA"]),
    ("SUNFLOWER", &["SURYAMUKHI"]),
    ("SESAMUM", &["SESAME", "TIL", "GINGELLY"]),
    ("RAPESEED & MUSTARD", &["MUSTARD", "SARSON", "RAPESEED"]),
    ("COTTON", &["KAPAS", "HATTI"]),
    ("BARLEY", &["JAU"]),
    ("SAFFLOWER", &["KUSUM"]),
    ("BRINJAL", &["EGGPLANT", "BAINGAN", "BADANE"]),
    ("TOMATO", &["TAMATAR"]),
    ("ONION", &["PYAZ", "EERULLI"]),
    ("POTATO", &["ALOO", "AALU"]),
    ("CABBAGE", &["PATTA GOBHI"]),
    ("GREEN CHILLI", &["MIRCHI", "CHILLY"]),
    ("BEANS", &["FRENCH BEANS", "HURALI"]),
];

/// Aliases registered for a canonical key (upper-case).
pub fn aliases_for(key: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Trims and upper-cases a crop name.
pub fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

fn contains_either_way(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Resolves `name` against `entries`. Returns `None` when nothing matches;
/// the caller then falls back to the other price source.
pub fn resolve<'a, T: CropKeyed>(name: &str, entries: &'a [T]) -> Option<&'a T> {
    let needle = normalize(name);
    if needle.is_empty() {
        return None;
    }

    if let Some(exact) = entries.iter().find(|e| normalize(e.crop_key()) == needle) {
        return Some(exact);
    }

    entries.iter().find(|entry| {
        let key = normalize(entry.crop_key());
        contains_either_way(&key, &needle)
            || aliases_for(&key)
                .iter()
                .any(|alias| contains_either_way(alias, &needle))
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry(&'static str);

    impl CropKeyed for Entry {
        fn crop_key(&self) -> &str {
            self.0
        }
    }

    const TABLE: &[Entry] = &[
        Entry("Paddy"),
        Entry("Tur"),
        Entry("Gram"),
        Entry("Brinjal"),
        Entry("Green Chilli"),
    ];

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(resolve("  brinjal ", TABLE).map(|e| e.0), Some("Brinjal"));
    }

    #[test]
    fn test_alias_match() {
        assert_eq!(resolve("Baingan", TABLE).map(|e| e.0), Some("Brinjal"));
        assert_eq!(resolve("rice", TABLE).map(|e| e.0), Some("Paddy"));
    }

    #[test]
    fn test_substring_in_both_directions() {
        // input contains key
        assert_eq!(resolve("Paddy (Common)", TABLE).map(|e| e.0), Some("Paddy"));
        // key contains input
        assert_eq!(resolve("chilli", TABLE).map(|e| e.0), Some("Green Chilli"));
    }

    #[test]
    fn test_exact_key_beats_earlier_alias_collision() {
        // Tur's alias "RED GRAM" contains "GRAM", but the exact key wins.
        assert_eq!(resolve("gram", TABLE).map(|e| e.0), Some("Gram"));
    }

    #[test]
    fn test_first_match_in_table_order() {
        // "RED GRAM" is listed under Tur, which comes before Gram.
        assert_eq!(resolve("red gram dal", TABLE).map(|e| e.0), Some("Tur"));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(resolve("Dragon Fruit", TABLE).is_none());
        assert!(resolve("   ", TABLE).is_none());
    }
}
