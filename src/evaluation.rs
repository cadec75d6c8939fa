//! Holdout splits and accuracy measurement.

use crate::classifier::TrainedModel;
use crate::corpus::LabeledName;
use rand::Rng;
use rand::seq::SliceRandom;

/// A helper type for holding train/test splits.
#[derive(Debug, Clone)]
pub struct DatasetSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffles `data` and moves `round(len * test_ratio)` items into the test set.
pub fn train_test_split<T, R>(data: &[T], test_ratio: f64, rng: &mut R) -> DatasetSplit<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut data = data.to_vec();
    data.shuffle(rng);

    let test_size = ((data.len() as f64) * test_ratio.clamp(0.0, 1.0)).round() as usize;
    let train = data.split_off(test_size.min(data.len()));

    DatasetSplit { train, test: data }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Counts how many examples the model labels correctly.
pub fn evaluate(model: &TrainedModel, examples: &[LabeledName]) -> Evaluation {
    let correct = examples
        .iter()
        .filter(|e| model.classify(&e.name).label == e.label)
        .count();
    Evaluation {
        correct,
        total: examples.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::corpus::TrainingCorpus;
    use crate::label::GenderLabel;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_split_sizes() {
        let data: Vec<u32> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let split = train_test_split(&data, 0.25, &mut rng);
        // 2.5 rounds away from zero
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);

        let mut all: Vec<u32> = split.train.iter().chain(&split.test).copied().collect();
        all.sort();
        assert_eq!(all, data);
    }

    #[test]
    fn test_split_is_reproducible() {
        let data: Vec<u32> = (0..50).collect();
        let a = train_test_split(&data, 0.2, &mut StdRng::seed_from_u64(1));
        let b = train_test_split(&data, 0.2, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.test, b.test);
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn test_split_extremes() {
        let data = vec![1, 2, 3];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(train_test_split(&data, 0.0, &mut rng).test.is_empty());
        assert!(train_test_split(&data, 1.0, &mut rng).train.is_empty());
        assert!(train_test_split(&data, 3.0, &mut rng).train.is_empty());
    }

    #[test]
    fn test_evaluate() {
        let corpus = TrainingCorpus::from_pairs([
            ("Maria", GenderLabel::Female),
            ("Anna", GenderLabel::Female),
            ("John", GenderLabel::Male),
            ("Mark", GenderLabel::Male),
        ])
        .unwrap();
        let model = TrainedModel::train(&corpus, ModelConfig::default()).unwrap();
        let eval = evaluate(&model, &corpus.examples());
        assert_eq!(eval.total, 4);
        assert_eq!(eval.correct, 4);
        assert_eq!(eval.accuracy(), 1.0);

        assert_eq!(evaluate(&model, &[]).accuracy(), 0.0);
    }

    #[test]
    fn test_builtin_training_accuracy() {
        let corpus = TrainingCorpus::builtin().unwrap();
        let model = TrainedModel::train(&corpus, ModelConfig::default()).unwrap();
        let eval = evaluate(&model, &corpus.examples());
        assert!(eval.accuracy() > 0.8, "accuracy {}", eval.accuracy());
    }
}
