//! Name/gender training data.
//!
//! Two CSV layouts are accepted:
//!
//! * labelled rows, `name,gender`, where gender is `M`/`F` (or `male`,
//!   `female`, `boy`, `girl`);
//! * count rows, `name,male_count,female_count`, as published in baby-name
//!   statistics. The majority label wins and exact ties are skipped.

use crate::error::{Error, Result};
use crate::features::normalize;
use crate::label::GenderLabel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

static BUILTIN_CSV: &str = include_str!("../data/names.csv");

/// Layout of a corpus CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusFormat {
    /// `name,gender`
    #[default]
    Labelled,
    /// `name,male_count,female_count`
    Counts,
}

/// A single training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledName {
    pub name: String,
    pub label: GenderLabel,
}

/// A record representing a single name and its gender counts.
#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct NameCounts {
    pub name: String,
    pub male_count: u32,
    pub female_count: u32,
}

impl NameCounts {
    /// The majority label, or `None` when both counts are equal.
    pub fn majority(&self) -> Option<GenderLabel> {
        if self.male_count > self.female_count {
            Some(GenderLabel::Male)
        } else if self.female_count > self.male_count {
            Some(GenderLabel::Female)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelRow {
    name: String,
    gender: Option<String>,
}

/// Mapping from case-folded name to gender label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingCorpus {
    entries: BTreeMap<String, GenderLabel>,
}

impl TrainingCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The corpus compiled into the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_CSV.as_bytes())
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, GenderLabel)>,
        S: AsRef<str>,
    {
        let mut corpus = Self::new();
        for (i, (name, label)) in pairs.into_iter().enumerate() {
            corpus.insert_row(i + 1, name.as_ref(), label)?;
        }
        Ok(corpus)
    }

    pub fn load(path: &Path, format: CorpusFormat) -> Result<Self> {
        match format {
            CorpusFormat::Labelled => Self::from_csv(path),
            CorpusFormat::Counts => Self::from_count_csv(path),
        }
    }

    /// Loads a `name,gender` CSV file.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut corpus = Self::new();

        for (i, result) in rdr.deserialize().enumerate() {
            let row = i + 1;
            let record: LabelRow = result?;
            let label = match record.gender.as_deref().map(str::trim) {
                None | Some("") => {
                    return Err(Error::MissingLabel {
                        row,
                        name: record.name,
                    });
                }
                Some(raw) => raw.parse::<GenderLabel>().map_err(|_| Error::UnknownLabel {
                    row,
                    label: raw.to_string(),
                })?,
            };
            corpus.insert_row(row, &record.name, label)?;
        }

        debug!("loaded {} labelled names", corpus.len());
        Ok(corpus)
    }

    /// Loads a `name,male_count,female_count` CSV file.
    pub fn from_count_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_count_reader(file)
    }

    pub fn from_count_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut corpus = Self::new();
        let mut skipped = 0usize;

        for (i, result) in rdr.deserialize().enumerate() {
            let record: NameCounts = result?;
            match record.majority() {
                Some(label) => corpus.insert_row(i + 1, &record.name, label)?,
                None => skipped += 1,
            }
        }

        debug!(
            "loaded {} names from counts, skipped {} ambiguous",
            corpus.len(),
            skipped
        );
        Ok(corpus)
    }

    /// Re-adding a name with the same label is a no-op.
    fn insert_row(&mut self, row: usize, name: &str, label: GenderLabel) -> Result<()> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(Error::EmptyName { row });
        }

        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(label);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == label => Ok(()),
            Entry::Occupied(slot) => Err(Error::ConflictingLabel {
                name: slot.key().clone(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, label: GenderLabel) -> usize {
        self.entries.values().filter(|&&l| l == label).count()
    }

    pub fn get(&self, name: &str) -> Option<GenderLabel> {
        self.entries.get(&normalize(name)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GenderLabel)> {
        self.entries.iter().map(|(name, &label)| (name.as_str(), label))
    }

    pub fn examples(&self) -> Vec<LabeledName> {
        self.iter()
            .map(|(name, label)| LabeledName {
                name: name.to_string(),
                label,
            })
            .collect()
    }
}
