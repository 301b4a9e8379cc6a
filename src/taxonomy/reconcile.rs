//! Pruning a class directory down to its slot capacity.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::errors::DatasetResult;

/// Outcome of reconciling one class directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Slot directories left in place, in sorted order.
    pub kept: Vec<PathBuf>,
    /// Slot directories deleted.
    pub removed: Vec<PathBuf>,
    /// Slot directories that could not be deleted.
    pub failed: Vec<PathBuf>,
}

/// Lists the sub-directories of `dir`, sorted by name.
///
/// The order is lexicographic on the raw file name, so `ka10` sorts before
/// `ka2`. It is stable across runs and is the order slots are filled in.
pub fn list_slot_dirs(dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    let mut slots = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            slots.push(entry.path());
        }
    }
    slots.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(slots)
}

/// Deletes every slot directory past `capacity`, contents included.
///
/// Directories are kept in sorted order, so the lexicographically smallest
/// names survive. A failed delete is logged and the remaining deletes still
/// run; nothing is rolled back.
///
/// # Errors
///
/// Only listing `class_dir` can fail the call.
pub fn reconcile_class(class_dir: &Path, capacity: usize) -> DatasetResult<ReconcileReport> {
    let slots = list_slot_dirs(class_dir)?;
    Ok(prune_slots(slots, capacity, |slot| std::fs::remove_dir_all(slot)))
}

fn prune_slots<F>(mut slots: Vec<PathBuf>, capacity: usize, mut remove: F) -> ReconcileReport
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut report = ReconcileReport::default();

    if slots.len() > capacity {
        for extra in slots.split_off(capacity) {
            match remove(&extra) {
                Ok(()) => {
                    info!("Deleted extra slot: {}", extra.display());
                    report.removed.push(extra);
                }
                Err(e) => {
                    warn!("Failed to delete slot {}: {}", extra.display(), e);
                    report.failed.push(extra);
                }
            }
        }
    }

    report.kept = slots;
    report
}
