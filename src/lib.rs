//! # gender-stats 🧠🚻
//!
//! Estimate the gender split of a project's contributors from their first names.
//!
//! Names are broken into character trigrams with start/end markers (`^an`, `nna`, `na$`),
//! counted per class, and scored with a Laplace-smoothed multinomial Naive Bayes model.
//! The classifier only ever answers `M` or `F`; callers that want an "unknown" bucket
//! apply their own confidence threshold, as [`GenderStats`] does.
//!
//! ## Features
//! - Character n-gram feature extraction
//! - Multinomial Naive Bayes with additive smoothing and a stable tie-break
//! - Label + probability prediction
//! - Built-in name corpus, or your own `name,gender` / count CSV
//! - Model persistence with `rmp-serde` (MessagePack)
//! - Auto-retrain when the corpus CSV is updated
//!
//! ## Example
//! ```rust
//! use gender_stats::{GenderLabel, ModelConfig, TrainingCorpus, classify, train};
//!
//! let corpus = TrainingCorpus::from_pairs([
//!     ("Maria", GenderLabel::Female),
//!     ("Anna", GenderLabel::Female),
//!     ("John", GenderLabel::Male),
//!     ("Mark", GenderLabel::Male),
//! ])?;
//! let model = train(&corpus, ModelConfig::default())?;
//!
//! let result = classify(&model, "Maria");
//! assert_eq!(result.label, GenderLabel::Female);
//! assert!(result.scores.female > result.scores.male);
//! # Ok::<(), gender_stats::Error>(())
//! ```

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod gender_classifier;
pub mod label;
pub mod stats;

pub use classifier::{
    ClassStatistics, ClassificationResult, FeatureWeight, LabelScores, TrainedModel, Trainer,
};
pub use config::ModelConfig;
pub use corpus::{CorpusFormat, LabeledName, NameCounts, TrainingCorpus};
pub use error::{Error, Result};
pub use evaluation::{DatasetSplit, Evaluation, evaluate, train_test_split};
pub use features::{Feature, extract};
pub use gender_classifier::GenderClassifier;
pub use label::GenderLabel;
pub use stats::{GenderStats, first_name};

/// Builds a model from `corpus`.
pub fn train(corpus: &TrainingCorpus, config: ModelConfig) -> Result<TrainedModel> {
    TrainedModel::train(corpus, config)
}

/// Scores `name` under both labels and picks the more likely one.
pub fn classify(model: &TrainedModel, name: &str) -> ClassificationResult {
    model.classify(name)
}

pub fn classify_label(model: &TrainedModel, name: &str) -> GenderLabel {
    model.classify(name).label
}
