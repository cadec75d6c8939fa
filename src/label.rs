use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two classes the classifier is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GenderLabel {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl GenderLabel {
    pub const ALL: [GenderLabel; 2] = [GenderLabel::Male, GenderLabel::Female];

    /// Short code used in CSV files and console output.
    pub fn code(self) -> &'static str {
        match self {
            GenderLabel::Male => "M",
            GenderLabel::Female => "F",
        }
    }
}

impl fmt::Display for GenderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

/// Returned when a string is not a recognised gender label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gender label {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for GenderLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "boy" => Ok(GenderLabel::Male),
            "f" | "female" | "girl" => Ok(GenderLabel::Female),
            _ => Err(ParseLabelError(s.to_string())),
        }
    }
}
