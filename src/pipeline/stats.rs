//! Run statistics.
//!
//! Every pipeline entry point returns a [`RunStats`] so callers can report how
//! many items were handled and how many were skipped.

use std::fmt;
use std::ops::AddAssign;

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Class directories visited.
    pub classes: usize,
    /// Slot directories visited.
    pub slots: usize,
    /// Images normalized, augmented and written back.
    pub images_processed: usize,
    /// Images that could not be read and were left as they were.
    pub images_skipped: usize,
    /// Images that were read but failed to transform or persist.
    pub images_failed: usize,
    /// Documents whose pages were written into slots.
    pub documents_extracted: usize,
    /// Documents skipped (no matching class, render or write failure).
    pub documents_skipped: usize,
    /// Documents moved into their class directory.
    pub documents_relocated: usize,
    /// Page images written into slots.
    pub pages_written: usize,
    /// Pages dropped because the class had fewer slots than pages.
    pub pages_dropped: usize,
    /// Slot directories deleted by reconciliation.
    pub slots_pruned: usize,
    /// Slot directories reconciliation failed to delete.
    pub prune_failures: usize,
}

impl RunStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of per-item problems recorded.
    pub fn problems(&self) -> usize {
        self.images_skipped + self.images_failed + self.documents_skipped + self.prune_failures
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.classes += other.classes;
        self.slots += other.slots;
        self.images_processed += other.images_processed;
        self.images_skipped += other.images_skipped;
        self.images_failed += other.images_failed;
        self.documents_extracted += other.documents_extracted;
        self.documents_skipped += other.documents_skipped;
        self.documents_relocated += other.documents_relocated;
        self.pages_written += other.pages_written;
        self.pages_dropped += other.pages_dropped;
        self.slots_pruned += other.slots_pruned;
        self.prune_failures += other.prune_failures;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Statistics:")?;
        writeln!(f, "  Classes: {}, slots: {}", self.classes, self.slots)?;
        writeln!(
            f,
            "  Images: {} processed, {} skipped, {} failed",
            self.images_processed, self.images_skipped, self.images_failed
        )?;
        writeln!(
            f,
            "  Documents: {} extracted, {} relocated, {} skipped",
            self.documents_extracted, self.documents_relocated, self.documents_skipped
        )?;
        writeln!(
            f,
            "  Pages: {} written, {} dropped",
            self.pages_written, self.pages_dropped
        )?;
        write!(
            f,
            "  Slots pruned: {} ({} failed)",
            self.slots_pruned, self.prune_failures
        )
    }
}
