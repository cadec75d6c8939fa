//! Gender split of a list of contributor names.

use crate::gender_classifier::GenderClassifier;
use crate::label::GenderLabel;
use std::fmt;

/// First whitespace-separated token of a display name, or `""` when the
/// profile has no name.
pub fn first_name(display_name: Option<&str>) -> String {
    display_name
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

/// Names bucketed by predicted label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenderStats {
    pub male: Vec<String>,
    pub female: Vec<String>,
    /// Names that were blank or below the confidence threshold.
    pub unknown: Vec<String>,
}

impl GenderStats {
    /// Classifies every name. Blank names, and names whose confidence is
    /// below `min_confidence`, are counted as unknown.
    pub fn collect<I, S>(classifier: &GenderClassifier, names: I, min_confidence: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stats = Self::default();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                stats.unknown.push(name);
                continue;
            }

            let result = classifier.classify_with_score(&name);
            if result.confidence() < min_confidence {
                stats.unknown.push(name);
                continue;
            }

            match result.label {
                GenderLabel::Male => stats.male.push(name),
                GenderLabel::Female => stats.female.push(name),
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.male.len() + self.female.len() + self.unknown.len()
    }

    pub fn percent_female(&self) -> f64 {
        percent(self.female.len(), self.total())
    }

    pub fn percent_male(&self) -> f64 {
        percent(self.male.len(), self.total())
    }

    pub fn percent_unknown(&self) -> f64 {
        percent(self.unknown.len(), self.total())
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for GenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\nMALE ({}):\n{}\n", self.male.len(), self.male.join("\n"))?;
        write!(
            f,
            "\nFEMALE ({}):\n{}\n",
            self.female.len(),
            self.female.join("\n")
        )?;
        writeln!(f, "\nContributors by Gender:")?;
        write!(f, "\n  - Female: {:.2}%\n", self.percent_female())?;
        write!(f, "\n  - Male: {:.2}%\n", self.percent_male())?;
        write!(f, "\n  - Unknown: {:.2}%\n\n", self.percent_unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::corpus::TrainingCorpus;

    fn classifier() -> GenderClassifier {
        let corpus = TrainingCorpus::from_pairs([
            ("Maria", GenderLabel::Female),
            ("Anna", GenderLabel::Female),
            ("John", GenderLabel::Male),
            ("Mark", GenderLabel::Male),
        ])
        .unwrap();
        GenderClassifier::train(&corpus, ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name(Some("Ada Lovelace")), "Ada");
        assert_eq!(first_name(Some("  Grace  Hopper ")), "Grace");
        assert_eq!(first_name(Some("")), "");
        assert_eq!(first_name(Some("   ")), "");
        assert_eq!(first_name(None), "");
    }

    #[test]
    fn test_collect_and_percentages() {
        let stats = GenderStats::collect(&classifier(), ["Maria", "John", "Anna", ""], 0.0);
        assert_eq!(stats.female, vec!["Maria", "Anna"]);
        assert_eq!(stats.male, vec!["John"]);
        assert_eq!(stats.unknown, vec![""]);
        assert_eq!(stats.percent_female(), 50.0);
        assert_eq!(stats.percent_male(), 25.0);
        assert_eq!(stats.percent_unknown(), 25.0);
    }

    #[test]
    fn test_confidence_threshold() {
        let classifier = classifier();
        // a single character shares nothing with the corpus, so the odds stay near even
        let stats = GenderStats::collect(&classifier, ["Maria", "q"], 0.8);
        assert_eq!(stats.female, vec!["Maria"]);
        assert_eq!(stats.unknown, vec!["q"]);
    }

    #[test]
    fn test_empty_input() {
        let stats = GenderStats::collect(&classifier(), Vec::<String>::new(), 0.0);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.percent_female(), 0.0);
        assert_eq!(stats.percent_male(), 0.0);
        assert_eq!(stats.percent_unknown(), 0.0);
    }

    #[test]
    fn test_display() {
        let stats = GenderStats::collect(&classifier(), ["Maria", "John"], 0.0);
        let out = stats.to_string();
        assert!(out.contains("MALE (1):\nJohn\n"));
        assert!(out.contains("FEMALE (1):\nMaria\n"));
        assert!(out.contains("  - Female: 50.00%"));
        assert!(out.ends_with("\n  - Unknown: 0.00%\n\n"));
    }
}
