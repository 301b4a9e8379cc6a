//! The dataset pipeline.
//!
//! This module wires the processors and the taxonomy into the three batch
//! operations the dataset builder runs:
//! - Document extraction into class slots
//! - Normalization and augmentation of stored images
//! - Storage root resolution and run statistics

pub mod extraction;
pub mod orchestrator;
pub mod root;
pub mod stats;

pub use extraction::{
    DocumentExtractor, DocumentOutcome, SlotAssignment, assign_slots, file_documents,
    list_documents, write_document_manifest,
};
pub use orchestrator::{ImageJob, Orchestrator};
pub use root::{CandidateRoots, FixedRoot, RootProvider};
pub use stats::RunStats;
