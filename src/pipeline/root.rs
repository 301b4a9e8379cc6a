//! Resolution of the dataset storage root.
//!
//! The pipeline never discovers storage locations itself; a [`RootProvider`]
//! hands it one validated directory or fails with `RootNotFound`.

use std::path::PathBuf;

use tracing::debug;

use crate::core::errors::{DatasetError, DatasetResult};

/// Supplies the directory the dataset lives under.
pub trait RootProvider {
    /// Returns an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::RootNotFound` if no usable directory exists.
    fn resolve_root(&self) -> DatasetResult<PathBuf>;
}

/// A single, explicitly configured root.
#[derive(Debug, Clone)]
pub struct FixedRoot {
    path: PathBuf,
}

impl FixedRoot {
    /// Creates a provider for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RootProvider for FixedRoot {
    fn resolve_root(&self) -> DatasetResult<PathBuf> {
        if self.path.is_dir() {
            Ok(self.path.clone())
        } else {
            Err(DatasetError::RootNotFound {
                path: self.path.clone(),
            })
        }
    }
}

/// The first existing directory of an ordered candidate list.
///
/// Callers build the list (for example from several sync-client mount
/// points); this type only checks them in order.
#[derive(Debug, Clone, Default)]
pub struct CandidateRoots {
    candidates: Vec<PathBuf>,
}

impl CandidateRoots {
    /// Creates a provider over `candidates`, checked in order.
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a candidate.
    pub fn with_candidate(mut self, path: impl Into<PathBuf>) -> Self {
        self.candidates.push(path.into());
        self
    }
}

impl RootProvider for CandidateRoots {
    fn resolve_root(&self) -> DatasetResult<PathBuf> {
        for candidate in &self.candidates {
            if candidate.is_dir() {
                debug!("Resolved root: {}", candidate.display());
                return Ok(candidate.clone());
            }
        }
        Err(DatasetError::RootNotFound {
            path: self.candidates.first().cloned().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(FixedRoot::new(tmp.path()).resolve_root().unwrap(), tmp.path());

        let missing = FixedRoot::new(tmp.path().join("missing"));
        assert!(matches!(
            missing.resolve_root(),
            Err(DatasetError::RootNotFound { .. })
        ));
    }

    #[test]
    fn test_fixed_root_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("root.txt");
        std::fs::write(&file, b"").unwrap();
        assert!(FixedRoot::new(file).resolve_root().is_err());
    }

    #[test]
    fn test_candidate_roots_first_existing_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let second = tmp.path().join("second");
        let third = tmp.path().join("third");
        std::fs::create_dir(&second).unwrap();
        std::fs::create_dir(&third).unwrap();

        let provider = CandidateRoots::new([tmp.path().join("first"), second.clone()])
            .with_candidate(third);
        assert_eq!(provider.resolve_root().unwrap(), second);
    }

    #[test]
    fn test_candidate_roots_none_exist() {
        let provider = CandidateRoots::new(["/definitely/not/here"]);
        assert!(provider.resolve_root().unwrap_err().is_fatal());
        assert!(CandidateRoots::default().resolve_root().is_err());
    }
}
