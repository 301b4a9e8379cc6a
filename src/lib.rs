//! # Modi Dataset
//!
//! Builds a training dataset of handwritten Modi-script characters from
//! scanned PDF documents.
//!
//! ## Features
//!
//! - Class/slot directory taxonomy for vowels, consonants, numerals and punctuation
//! - PDF page rendering into per-inflection slots
//! - Deterministic normalization (grayscale, smoothing, adaptive threshold, 224x224 resize)
//! - Randomized augmentation (rotation, shift, occasional blur)
//! - Optional parallel processing with reproducible seeded runs
//!
//! ## Modules
//!
//! * [`core`] - Configuration, constants and error handling
//! * [`taxonomy`] - Alphabet, directory layout and slot reconciliation
//! * [`processors`] - Image processing stages
//! * [`pipeline`] - Extraction and batch orchestration
//! * [`utils`] - Image IO, PDF rendering and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modi_dataset::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatasetConfig::default();
//! let root = FixedRoot::new("/data/modi").resolve_root()?;
//! let classes = root.join("data/01_raw/chars");
//!
//! TaxonomyManager::new(Alphabet::default(), &config)?.ensure_layout(&classes)?;
//!
//! let extractor = DocumentExtractor::new(&config)?;
//! extractor.extract_all(Path::new("/data/scans"), &classes)?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let stats = Orchestrator::new(&config)?.process_tree(&classes, &mut rng)?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod taxonomy;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use modi_dataset::prelude::*;
/// ```
///
/// For the individual image stages, import from [`processors`](crate::processors).
pub mod prelude {
    pub use crate::core::{DatasetConfig, DatasetError, DatasetResult};

    pub use crate::pipeline::{
        CandidateRoots, DocumentExtractor, FixedRoot, Orchestrator, RootProvider, RunStats,
    };

    pub use crate::taxonomy::{Alphabet, TaxonomyManager};

    pub use crate::utils::{init_tracing, load_image};
}
