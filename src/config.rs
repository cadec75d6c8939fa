//! Hyperparameters of the name classifier.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Feature window and smoothing used for training and scoring.
///
/// The values are stored inside every trained model, so a model is always
/// queried with the settings it was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Length of the character n-grams taken from the marker-padded name.
    pub ngram: usize,

    /// Additive (Laplace) smoothing constant. Must be finite and positive.
    pub smoothing: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ngram: 3,
            smoothing: 1.0,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ngram(mut self, ngram: usize) -> Self {
        self.ngram = ngram;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ngram == 0 {
            return Err(Error::InvalidConfig("ngram must be at least 1".into()));
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}
