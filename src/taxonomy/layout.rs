//! Materializing the class/slot directory tree.

use std::path::Path;

use tracing::{debug, info};

use super::alphabet::Alphabet;
use super::reconcile::{ReconcileReport, reconcile_class};
use crate::core::config::{ConfigValidator, DatasetConfig};
use crate::core::constants::{NUMERALS_DIR, PUNCTUATION_DIR, VOWELS_DIR};
use crate::core::errors::{DatasetError, DatasetResult};

/// Counts of directories touched by [`TaxonomyManager::ensure_layout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Directories that were missing and got created.
    pub created: usize,
    /// Directories that already existed and were left alone.
    pub existing: usize,
}

/// Creates and reconciles the dataset directory taxonomy.
///
/// Layout produced under a base directory:
///
/// ```text
/// <base>/vowels/<vowel>/
/// <base>/numerals/<digit>/
/// <base>/punctuation/<mark>/
/// <base>/<consonant>/<consonant><1..N>/
/// ```
#[derive(Debug, Clone)]
pub struct TaxonomyManager {
    alphabet: Alphabet,
    inflection_count: usize,
    slot_capacity: usize,
}

impl TaxonomyManager {
    /// Creates a manager for `alphabet` using the capacities in `config`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Config` if the configuration is invalid.
    pub fn new(alphabet: Alphabet, config: &DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        Ok(Self {
            alphabet,
            inflection_count: config.inflection_count,
            slot_capacity: config.slot_capacity,
        })
    }

    /// Creates every missing directory of the taxonomy under `base`.
    ///
    /// Existing directories, and anything inside them, are left untouched, so
    /// calling this repeatedly is safe.
    pub fn ensure_layout(&self, base: &Path) -> DatasetResult<LayoutReport> {
        let mut report = LayoutReport::default();
        ensure_dir(base, &mut report)?;

        for (category, items) in [
            (VOWELS_DIR, &self.alphabet.vowels),
            (NUMERALS_DIR, &self.alphabet.numerals),
            (PUNCTUATION_DIR, &self.alphabet.punctuation),
        ] {
            let category_dir = base.join(category);
            ensure_dir(&category_dir, &mut report)?;
            for item in items {
                ensure_dir(&category_dir.join(item), &mut report)?;
            }
        }

        for consonant in &self.alphabet.consonants {
            let class_dir = base.join(consonant);
            ensure_dir(&class_dir, &mut report)?;
            for slot in Alphabet::inflection_names(consonant, self.inflection_count) {
                ensure_dir(&class_dir.join(slot), &mut report)?;
            }
        }

        info!(
            "Dataset structure ready under {} ({} created, {} existing)",
            base.display(),
            report.created,
            report.existing
        );
        Ok(report)
    }

    /// Prunes `class_dir` down to the slot capacity.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::ClassNotFound` if `class_dir` is not a directory.
    pub fn reconcile(&self, class_dir: &Path) -> DatasetResult<ReconcileReport> {
        if !class_dir.is_dir() {
            return Err(DatasetError::ClassNotFound {
                class: class_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| class_dir.display().to_string()),
            });
        }
        reconcile_class(class_dir, self.slot_capacity)
    }
}

fn ensure_dir(path: &Path, report: &mut LayoutReport) -> DatasetResult<()> {
    if path.is_dir() {
        report.existing += 1;
    } else {
        std::fs::create_dir_all(path)?;
        debug!("Created {}", path.display());
        report.created += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::reconcile::list_slot_dirs;

    fn small_alphabet() -> Alphabet {
        Alphabet {
            vowels: vec!["a".into(), "aa".into()],
            consonants: vec!["ka".into(), "ṭa".into()],
            numerals: vec!["0".into()],
            punctuation: vec!["danda".into()],
        }
    }

    #[test]
    fn test_creates_full_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = TaxonomyManager::new(small_alphabet(), &DatasetConfig::default()).unwrap();
        let report = manager.ensure_layout(tmp.path()).unwrap();

        assert!(tmp.path().join("vowels/aa").is_dir());
        assert!(tmp.path().join("numerals/0").is_dir());
        assert!(tmp.path().join("punctuation/danda").is_dir());
        assert!(tmp.path().join("ka/ka12").is_dir());
        assert!(tmp.path().join("ṭa/ṭa1").is_dir());
        assert_eq!(list_slot_dirs(&tmp.path().join("ka")).unwrap().len(), 12);
        // 3 categories + 4 items + 2 consonants * (1 + 12); the base already existed.
        assert_eq!(report.created, 33);
        assert_eq!(report.existing, 1);
    }

    #[test]
    fn test_idempotent_and_preserves_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = TaxonomyManager::new(small_alphabet(), &DatasetConfig::default()).unwrap();
        manager.ensure_layout(tmp.path()).unwrap();
        let sample = tmp.path().join("ka/ka3/ka_3.png");
        std::fs::write(&sample, b"png").unwrap();

        let second = manager.ensure_layout(tmp.path()).unwrap();
        assert_eq!(second.created, 0);
        assert!(sample.exists());
    }

    #[test]
    fn test_custom_inflection_count() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DatasetConfig::default().with_inflection_count(3);
        let manager = TaxonomyManager::new(small_alphabet(), &config).unwrap();
        manager.ensure_layout(tmp.path()).unwrap();
        assert_eq!(list_slot_dirs(&tmp.path().join("ka")).unwrap().len(), 3);
    }

    #[test]
    fn test_reconcile_missing_class() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = TaxonomyManager::new(small_alphabet(), &DatasetConfig::default()).unwrap();
        let err = manager.reconcile(&tmp.path().join("kha")).unwrap_err();
        assert!(matches!(err, DatasetError::ClassNotFound { class } if class == "kha"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = DatasetConfig::default().with_slot_capacity(0);
        let err = TaxonomyManager::new(small_alphabet(), &config).unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
    }
}
