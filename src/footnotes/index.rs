//! The footnote index: normalized key → footnote body.

use std::collections::HashMap;

use crate::text::{first_number, is_breadcrumb};

/// Prefixes of cross-reference anchor names whose suffix is also a valid key
/// (`fw12` is reachable as `12`).
pub const CROSS_REFERENCE_PREFIXES: [&str; 2] = ["fw", "bk"];

/// The standard aliases a numbered footnote is reachable under.
pub fn numeric_aliases(number: &str) -> [String; 5] {
    [
        number.to_string(),
        format!("n{number}"),
        format!("note{number}"),
        format!("footnote{number}"),
        format!("fn{number}"),
    ]
}

/// Insertion-ordered map from footnote key to sanitized (unescaped) body text.
///
/// Order matters: alias generation is first-writer-wins, so two footnotes
/// competing for the alias `3` resolve by which was indexed first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteIndex {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl FootnoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.positions.get(&key) {
            Some(&i) => self.entries[i].1 = text,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, text));
            }
        }
    }

    /// Insert only if the key is absent. Returns whether the entry was added.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, text: impl Into<String>) -> bool {
        let key = key.into();
        if self.positions.contains_key(&key) {
            return false;
        }
        self.insert(key, text);
        true
    }

    /// Iterate over `(key, text)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Produce the final index: lowercase every key, drop breadcrumb-shaped
    /// and oversized bodies, then add numeric and cross-reference aliases.
    /// Aliases never overwrite a key that is already present.
    pub fn normalized(&self, max_footnote_length: usize) -> FootnoteIndex {
        let mut normalized = FootnoteIndex::new();

        for (key, text) in &self.entries {
            if is_breadcrumb(text) || text.chars().count() > max_footnote_length {
                continue;
            }

            let key = key.to_lowercase();
            normalized.insert_if_absent(key.as_str(), text.as_str());

            if let Some(number) = first_number(&key) {
                for alias in numeric_aliases(number) {
                    normalized.insert_if_absent(alias, text.as_str());
                }
            }

            for prefix in CROSS_REFERENCE_PREFIXES {
                if let Some(stripped) = key.strip_prefix(prefix)
                    && !stripped.is_empty()
                {
                    normalized.insert_if_absent(stripped, text.as_str());
                }
            }
        }

        normalized
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FootnoteIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = FootnoteIndex::new();
        for (k, v) in iter {
            index.insert(k, v);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_insert_keeps_position_on_overwrite() {
        let mut index = FootnoteIndex::new();
        index.insert("a", "1");
        index.insert("b", "2");
        index.insert("a", "3");

        let pairs: Vec<_> = index.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_insert_if_absent() {
        let mut index = FootnoteIndex::new();
        assert!(index.insert_if_absent("n1", "first"));
        assert!(!index.insert_if_absent("n1", "second"));
        assert_eq!(index.get("n1"), Some("first"));
    }

    #[test]
    fn test_numeric_aliases() {
        let index: FootnoteIndex = [("N3", "Body")].into_iter().collect();
        let normalized = index.normalized(50_000);

        for key in ["n3", "3", "note3", "footnote3", "fn3"] {
            assert_eq!(normalized.get(key), Some("Body"), "missing alias {key}");
        }
        assert!(normalized.get("N3").is_none());
    }

    #[test]
    fn test_cross_reference_prefix() {
        let index: FootnoteIndex = [("fw12", "Body")].into_iter().collect();
        let normalized = index.normalized(50_000);
        assert_eq!(normalized.get("12"), Some("Body"));
        assert_eq!(normalized.get("fw12"), Some("Body"));
    }

    #[test]
    fn test_bk_prefix_without_number() {
        let index: FootnoteIndex = [("bkintro", "Body")].into_iter().collect();
        let normalized = index.normalized(50_000);
        assert_eq!(normalized.get("intro"), Some("Body"));
    }

    #[test]
    fn test_aliases_never_overwrite_direct_keys() {
        let index: FootnoteIndex = [("n1", "First"), ("1", "Direct one"), ("note1", "Third")]
            .into_iter()
            .collect();
        let normalized = index.normalized(50_000);

        assert_eq!(normalized.get("n1"), Some("First"));
        // "1" was claimed as an alias of n1 before the direct entry was seen
        assert_eq!(normalized.get("1"), Some("First"));
        assert_eq!(normalized.get("note1"), Some("First"));
    }

    #[test]
    fn test_breadcrumb_bodies_excluded() {
        let index: FootnoteIndex = [("n1", "MIA > Archive > Author"), ("n2", "Real note")]
            .into_iter()
            .collect();
        let normalized = index.normalized(50_000);
        assert!(normalized.get("n1").is_none());
        assert!(normalized.get("1").is_none());
        assert_eq!(normalized.get("2"), Some("Real note"));
    }

    #[test]
    fn test_oversized_bodies_excluded() {
        let index: FootnoteIndex = [("n1", "x".repeat(20))].into_iter().collect();
        assert!(index.normalized(19).is_empty());
        assert_eq!(index.normalized(20).len(), 5);
    }

    proptest! {
        #[test]
        fn prop_normalized_keys_are_lowercase(
            keys in prop::collection::vec("[A-Za-z]{0,4}[0-9]{0,3}[A-Za-z]{0,2}", 1..8)
        ) {
            let index: FootnoteIndex = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), format!("Body {i}")))
                .collect();
            let normalized = index.normalized(50_000);
            for key in normalized.keys() {
                prop_assert_eq!(key.to_string(), key.to_lowercase());
            }
        }

        #[test]
        fn prop_numbered_keys_reachable_by_every_alias(number in 0u32..10_000, prefix in "[a-z]{0,3}") {
            let key = format!("{prefix}{number}");
            let index: FootnoteIndex = [(key, "Body")].into_iter().collect();
            let normalized = index.normalized(50_000);
            for alias in numeric_aliases(&number.to_string()) {
                prop_assert_eq!(normalized.get(&alias), Some("Body"));
            }
        }
    }
}
