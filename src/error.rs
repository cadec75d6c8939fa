//! Errors raised while building, loading or saving a model.

use crate::label::GenderLabel;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A corpus row has a blank name.
    #[error("corpus row {row}: empty name")]
    EmptyName { row: usize },

    /// A corpus row has a name but no gender.
    #[error("corpus row {row}: missing gender label for {name:?}")]
    MissingLabel { row: usize, name: String },

    #[error("corpus row {row}: unknown gender label {label:?}")]
    UnknownLabel { row: usize, label: String },

    /// The same (case-folded) name appears with both labels.
    #[error("name {name:?} is labelled both M and F")]
    ConflictingLabel { name: String },

    /// An example passed to a trainer has no features.
    #[error("training example {index}: empty name")]
    EmptyExample { index: usize },

    /// Training finished without a single example for this label.
    #[error("training data has no {0} examples")]
    MissingClass(GenderLabel),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("failed to serialize model: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to deserialize model: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}
