//! The character inventory the dataset is organized by.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::DatasetResult;

/// Lists of class labels per category.
///
/// Labels are ASCII/IAST transliterations and double as directory names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alphabet {
    /// Independent vowels.
    pub vowels: Vec<String>,
    /// Consonants; each one gets a full set of inflection slots.
    pub consonants: Vec<String>,
    /// Digits.
    pub numerals: Vec<String>,
    /// Punctuation marks.
    pub punctuation: Vec<String>,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Alphabet {
    /// The Modi script inventory used for Marathi.
    fn default() -> Self {
        Self {
            vowels: labels(&[
                "a", "aa", "i", "ii", "u", "uu", "ru", "ruu", "e", "ai", "o", "au",
            ]),
            consonants: labels(&[
                "ka", "kha", "ga", "gha", "nga",
                "cha", "chha", "ja", "jha", "nya",
                "ṭa", "ṭha", "ḍa", "ḍha", "ṇa",
                "ta", "tha", "da", "dha", "na",
                "pa", "pha", "ba", "bha", "ma",
                "ya", "ra", "la", "va",
                "śa", "ṣa", "sa", "ha", "ḷa",
            ]),
            numerals: labels(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]),
            punctuation: labels(&["danda", "double_danda"]),
        }
    }
}

impl Alphabet {
    /// Reads an alphabet from a JSON file. Missing categories keep the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Names of the inflection slots of `consonant`: `<consonant>1` .. `<consonant>N`.
    pub fn inflection_names(consonant: &str, count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("{consonant}{i}")).collect()
    }

    /// Total number of class labels.
    pub fn len(&self) -> usize {
        self.vowels.len() + self.consonants.len() + self.numerals.len() + self.punctuation.len()
    }

    /// Returns true if no labels are defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
