use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const START: char = '^';
const END: char = '$';

/// A character n-gram taken from a lowercased, marker-padded name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(String);

impl Feature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Feature {
    fn from(s: &str) -> Self {
        Feature(s.to_string())
    }
}

/// Case-folds a name the same way for training and for queries.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Extracts the n-gram features of `name`.
///
/// The name is wrapped in `^`/`$` so a prefix or suffix is a different
/// feature from the same letters in the middle of a word. Blank names give
/// an empty set. The returned set is ordered, which keeps score summation
/// deterministic.
pub fn extract(name: &str, ngram: usize) -> BTreeSet<Feature> {
    let name = normalize(name);
    let mut features = BTreeSet::new();
    if name.is_empty() || ngram == 0 {
        return features;
    }

    let mut chars: Vec<char> = Vec::with_capacity(name.len() + 2);
    chars.push(START);
    chars.extend(name.chars());
    chars.push(END);

    if chars.len() <= ngram {
        features.insert(Feature(chars.iter().collect()));
        return features;
    }

    for window in chars.windows(ngram) {
        features.insert(Feature(window.iter().collect()));
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(features: &BTreeSet<Feature>) -> Vec<&str> {
        features.iter().map(Feature::as_str).collect()
    }

    #[test]
    fn test_trigrams_with_markers() {
        let feats = extract("Maria", 3);
        assert_eq!(strings(&feats), vec!["^ma", "ari", "ia$", "mar", "ria"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract("ANNA", 3), extract("anna", 3));
        assert_eq!(extract("  Anna ", 3), extract("anna", 3));
    }

    #[test]
    fn test_blank_names_have_no_features() {
        assert!(extract("", 3).is_empty());
        assert!(extract("   \t", 3).is_empty());
    }

    #[test]
    fn test_short_name_is_single_feature() {
        assert_eq!(strings(&extract("a", 3)), vec!["^a$"]);
        assert_eq!(strings(&extract("a", 5)), vec!["^a$"]);
    }

    #[test]
    fn test_repeated_ngrams_are_deduplicated() {
        // "^aaaa$" has the window "aaa" twice
        let feats = extract("aaaa", 3);
        assert_eq!(strings(&feats), vec!["^aa", "aa$", "aaa"]);
    }

    #[test]
    fn test_unicode_names() {
        let feats = extract("Zoë", 2);
        assert!(feats.contains(&Feature::from("ë$")));
        assert!(feats.contains(&Feature::from("^z")));
    }
}
