use crate::classifier::{ClassificationResult, TrainedModel};
use crate::config::ModelConfig;
use crate::corpus::TrainingCorpus;
use crate::error::Result;
use crate::label::GenderLabel;
use log::info;

/// Trains once and answers any number of name queries.
///
/// ```rust
/// use gender_stats::{GenderClassifier, GenderLabel};
///
/// let classifier = GenderClassifier::builtin().unwrap();
/// let (label, p_male, p_female) = classifier.predict_with_proba("Maria");
/// assert_eq!(label, GenderLabel::Female);
/// assert!(p_female > p_male);
/// ```
#[derive(Debug, Clone)]
pub struct GenderClassifier {
    model: TrainedModel,
}

impl GenderClassifier {
    /// Trains on the corpus bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::builtin_with(ModelConfig::default())
    }

    pub fn builtin_with(config: ModelConfig) -> Result<Self> {
        let corpus = TrainingCorpus::builtin()?;
        Self::train(&corpus, config)
    }

    pub fn train(corpus: &TrainingCorpus, config: ModelConfig) -> Result<Self> {
        let model = TrainedModel::train(corpus, config)?;
        info!(
            "classifier ready: {} male / {} female names",
            model.stats(GenderLabel::Male).examples(),
            model.stats(GenderLabel::Female).examples()
        );
        Ok(Self { model })
    }

    pub fn from_model(model: TrainedModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn classify(&self, name: &str) -> GenderLabel {
        self.model.classify(name).label
    }

    pub fn classify_with_score(&self, name: &str) -> ClassificationResult {
        self.model.classify(name)
    }

    /// Predicts a label and returns it with `(p_male, p_female)`.
    pub fn predict_with_proba(&self, name: &str) -> (GenderLabel, f64, f64) {
        let result = self.model.classify(name);
        let (p_male, p_female) = result.probabilities();
        (result.label, p_male, p_female)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classifies_training_names() {
        let classifier = GenderClassifier::builtin().unwrap();
        let result = classifier.classify_with_score("Maria");
        assert_eq!(result.label, GenderLabel::Female);
        assert_eq!(classifier.classify("Maria"), result.label);
    }

    #[test]
    fn test_probabilities_agree_with_label() {
        let classifier = GenderClassifier::builtin().unwrap();
        for name in ["Anna", "Robert", "", "Q"] {
            let (label, p_male, p_female) = classifier.predict_with_proba(name);
            assert!((p_male + p_female - 1.0).abs() < 1e-9);
            match label {
                GenderLabel::Male => assert!(p_male >= p_female, "{name}"),
                GenderLabel::Female => assert!(p_female >= p_male, "{name}"),
            }
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let classifier = std::sync::Arc::new(GenderClassifier::builtin().unwrap());
        let expected = classifier.classify_with_score("Jennifer");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let classifier = std::sync::Arc::clone(&classifier);
                std::thread::spawn(move || classifier.classify_with_score("Jennifer"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
