//! Multinomial Naive Bayes over character n-grams of first names.
//!
//! Each example contributes its deduplicated feature set to the statistics
//! of its class. A query scores each class as
//!
//! ```text
//! ln(prior) + Σ ln((count(f) + α) / (total + α·V))
//! ```
//!
//! where `V` is the number of distinct features seen in training. With
//! `α > 0` every term is finite, unseen features included.

use crate::config::ModelConfig;
use crate::corpus::{CorpusFormat, LabeledName, TrainingCorpus};
use crate::error::{Error, Result};
use crate::features::{Feature, extract};
use crate::label::GenderLabel;
use log::{debug, info};
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;

/// Feature counts for one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatistics {
    examples: u64,
    feature_total: u64,
    features: BTreeMap<Feature, u64>,
}

impl ClassStatistics {
    fn add(&mut self, features: &BTreeSet<Feature>) {
        self.examples += 1;
        for f in features {
            *self.features.entry(f.clone()).or_insert(0) += 1;
            self.feature_total += 1;
        }
    }

    /// Number of training names with this label.
    pub fn examples(&self) -> u64 {
        self.examples
    }

    /// Sum of all feature counts.
    pub fn feature_total(&self) -> u64 {
        self.feature_total
    }

    pub fn count(&self, feature: &Feature) -> u64 {
        self.features.get(feature).copied().unwrap_or(0)
    }

    pub fn features(&self) -> impl Iterator<Item = (&Feature, u64)> {
        self.features.iter().map(|(f, &n)| (f, n))
    }

    fn check(&self, label: GenderLabel) -> Result<()> {
        if self.examples == 0 {
            return Err(Error::InvalidModel(format!("no {label} examples")));
        }
        let mut sum = 0u64;
        for (feature, &count) in &self.features {
            if count == 0 || count > self.examples {
                return Err(Error::InvalidModel(format!(
                    "{label} count {count} for {feature:?} out of range"
                )));
            }
            sum += count;
        }
        if sum != self.feature_total {
            return Err(Error::InvalidModel(format!(
                "{label} feature total {} does not match counts ({sum})",
                self.feature_total
            )));
        }
        Ok(())
    }
}

/// Accumulates examples and builds a [`TrainedModel`].
///
/// Counts are plain sums, so the order examples are added in has no effect
/// on the built model.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: ModelConfig,
    male: ClassStatistics,
    female: ClassStatistics,
}

impl Trainer {
    /// Fails on an invalid config before any example is seen.
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            male: ClassStatistics::default(),
            female: ClassStatistics::default(),
        })
    }

    pub fn add(&mut self, name: &str, label: GenderLabel) -> Result<()> {
        let features = extract(name, self.config.ngram);
        if features.is_empty() {
            return Err(Error::EmptyExample {
                index: (self.male.examples + self.female.examples + 1) as usize,
            });
        }
        self.stats_mut(label).add(&features);
        Ok(())
    }

    pub fn add_corpus(&mut self, corpus: &TrainingCorpus) -> Result<()> {
        for (name, label) in corpus.iter() {
            self.add(name, label)?;
        }
        Ok(())
    }

    pub fn add_examples(&mut self, examples: &[LabeledName]) -> Result<()> {
        for example in examples {
            self.add(&example.name, example.label)?;
        }
        Ok(())
    }

    fn stats_mut(&mut self, label: GenderLabel) -> &mut ClassStatistics {
        match label {
            GenderLabel::Male => &mut self.male,
            GenderLabel::Female => &mut self.female,
        }
    }

    pub fn build(&self) -> Result<TrainedModel> {
        for label in GenderLabel::ALL {
            let stats = match label {
                GenderLabel::Male => &self.male,
                GenderLabel::Female => &self.female,
            };
            if stats.examples == 0 {
                return Err(Error::MissingClass(label));
            }
        }

        let model = TrainedModel {
            config: self.config,
            vocab_size: vocabulary_size(&self.male, &self.female),
            male: self.male.clone(),
            female: self.female.clone(),
        };
        debug!(
            "built model: {} male, {} female, {} features",
            model.male.examples, model.female.examples, model.vocab_size
        );
        Ok(model)
    }
}

fn vocabulary_size(male: &ClassStatistics, female: &ClassStatistics) -> usize {
    let female_only = female
        .features
        .keys()
        .filter(|f| !male.features.contains_key(*f))
        .count();
    male.features.len() + female_only
}

/// Log-likelihood of a name under each label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelScores {
    pub male: f64,
    pub female: f64,
}

impl LabelScores {
    pub fn get(&self, label: GenderLabel) -> f64 {
        match label {
            GenderLabel::Male => self.male,
            GenderLabel::Female => self.female,
        }
    }

    /// Normalises the two scores into `(p_male, p_female)`.
    pub fn probabilities(&self) -> (f64, f64) {
        let max = self.male.max(self.female);
        let male = (self.male - max).exp();
        let female = (self.female - max).exp();
        let sum = male + female;
        (male / sum, female / sum)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub label: GenderLabel,
    /// Score of `label`. Only comparable with other scores of the same model.
    pub score: f64,
    pub scores: LabelScores,
}

impl ClassificationResult {
    pub fn probabilities(&self) -> (f64, f64) {
        self.scores.probabilities()
    }

    /// Probability of the returned label, in `[0.5, 1]`.
    pub fn confidence(&self) -> f64 {
        let (male, female) = self.probabilities();
        match self.label {
            GenderLabel::Male => male,
            GenderLabel::Female => female,
        }
    }
}

/// A feature ranked by how strongly it separates the two labels.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeight {
    pub feature: Feature,
    pub male_count: u64,
    pub female_count: u64,
    /// `ln P(f | F) - ln P(f | M)`; positive values favour Female.
    pub log_ratio: f64,
}

impl FeatureWeight {
    pub fn favours(&self) -> GenderLabel {
        if self.log_ratio > 0.0 {
            GenderLabel::Female
        } else {
            GenderLabel::Male
        }
    }
}

/// Immutable per-class statistics, ready for queries.
///
/// Deserializing always runs [`TrainedModel::validate`], so a decoded model
/// is as usable as a freshly trained one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrainedModel")]
pub struct TrainedModel {
    config: ModelConfig,
    male: ClassStatistics,
    female: ClassStatistics,
    vocab_size: usize,
}

#[derive(Deserialize)]
struct RawTrainedModel {
    config: ModelConfig,
    male: ClassStatistics,
    female: ClassStatistics,
    vocab_size: usize,
}

impl TryFrom<RawTrainedModel> for TrainedModel {
    type Error = Error;

    fn try_from(raw: RawTrainedModel) -> Result<Self> {
        let model = TrainedModel {
            config: raw.config,
            male: raw.male,
            female: raw.female,
            vocab_size: raw.vocab_size,
        };
        model.validate()?;
        Ok(model)
    }
}

impl TrainedModel {
    pub fn train(corpus: &TrainingCorpus, config: ModelConfig) -> Result<Self> {
        let mut trainer = Trainer::new(config)?;
        trainer.add_corpus(corpus)?;
        let model = trainer.build()?;
        info!(
            "trained on {} names ({} features)",
            corpus.len(),
            model.vocab_size
        );
        Ok(model)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn stats(&self, label: GenderLabel) -> &ClassStatistics {
        match label {
            GenderLabel::Male => &self.male,
            GenderLabel::Female => &self.female,
        }
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn total_examples(&self) -> u64 {
        self.male.examples + self.female.examples
    }

    fn denominator(&self, stats: &ClassStatistics) -> f64 {
        stats.feature_total as f64 + self.config.smoothing * self.vocab_size as f64
    }

    fn feature_log_prob(&self, stats: &ClassStatistics, feature: &Feature) -> f64 {
        (stats.count(feature) as f64 + self.config.smoothing).ln() - self.denominator(stats).ln()
    }

    fn class_score(&self, stats: &ClassStatistics, features: &BTreeSet<Feature>) -> f64 {
        let prior = (stats.examples as f64 / self.total_examples() as f64).ln();
        features
            .iter()
            .fold(prior, |acc, f| acc + self.feature_log_prob(stats, f))
    }

    pub fn scores(&self, name: &str) -> LabelScores {
        let features = extract(name, self.config.ngram);
        LabelScores {
            male: self.class_score(&self.male, &features),
            female: self.class_score(&self.female, &features),
        }
    }

    /// Label used when both scores are exactly equal: the label with more
    /// training examples, or Male if those are equal too.
    pub fn tie_break(&self) -> GenderLabel {
        if self.female.examples > self.male.examples {
            GenderLabel::Female
        } else {
            GenderLabel::Male
        }
    }

    pub fn classify(&self, name: &str) -> ClassificationResult {
        let scores = self.scores(name);
        let label = if scores.male > scores.female {
            GenderLabel::Male
        } else if scores.female > scores.male {
            GenderLabel::Female
        } else {
            self.tie_break()
        };
        ClassificationResult {
            label,
            score: scores.get(label),
            scores,
        }
    }

    /// Returns the `n` features with the largest absolute log ratio.
    pub fn top_features(&self, n: usize) -> Vec<FeatureWeight> {
        let vocab: BTreeSet<&Feature> = self
            .male
            .features
            .keys()
            .chain(self.female.features.keys())
            .collect();

        let mut weights: Vec<FeatureWeight> = vocab
            .into_iter()
            .map(|feature| FeatureWeight {
                feature: feature.clone(),
                male_count: self.male.count(feature),
                female_count: self.female.count(feature),
                log_ratio: self.feature_log_prob(&self.female, feature)
                    - self.feature_log_prob(&self.male, feature),
            })
            .collect();

        weights.sort_by(|a, b| {
            b.log_ratio
                .abs()
                .total_cmp(&a.log_ratio.abs())
                .then_with(|| a.feature.cmp(&b.feature))
        });
        weights.truncate(n);
        weights
    }

    /// Checks the invariants a trained model always satisfies.
    pub fn validate(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| Error::InvalidModel(e.to_string()))?;
        self.male.check(GenderLabel::Male)?;
        self.female.check(GenderLabel::Female)?;
        let vocab_size = vocabulary_size(&self.male, &self.female);
        if vocab_size != self.vocab_size {
            return Err(Error::InvalidModel(format!(
                "vocabulary size {} does not match features ({vocab_size})",
                self.vocab_size
            )));
        }
        Ok(())
    }

    /// Saves the model to a binary `.msgpack` file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_named(&mut writer, self)?;
        writer.flush()?;
        info!("saved model to {path:?}");
        Ok(())
    }

    /// Loads and validates a model from a binary `.msgpack` file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let model = Self::from_reader(BufReader::new(file))?;
        info!("loaded model from {path:?}");
        Ok(model)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(from_read(reader)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Loads a saved model if it is newer than the corpus, otherwise trains
    /// a fresh one from the corpus and saves it.
    pub fn load_or_train_if_stale(
        model_path: &Path,
        corpus_path: &Path,
        format: CorpusFormat,
        config: ModelConfig,
    ) -> Result<Self> {
        let model_mtime = model_path
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let corpus_mtime = corpus_path
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let should_retrain = !model_path.exists() || corpus_mtime > model_mtime;

        if should_retrain {
            info!("training model from {corpus_path:?} (corpus is newer or model missing)");
            let corpus = TrainingCorpus::load(corpus_path, format)?;
            let model = Self::train(&corpus, config)?;
            model.save_to_file(model_path)?;
            Ok(model)
        } else {
            debug!("model {model_path:?} is up to date");
            Self::load_from_file(model_path)
        }
    }
}
