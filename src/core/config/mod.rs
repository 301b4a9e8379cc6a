//! Configuration for the dataset pipeline.
//!
//! - [`DatasetConfig`] holds capacities, image constants and augmentation bounds.
//! - [`ParallelPolicy`] controls orchestrator scheduling.
//! - [`ConfigValidator`] and [`ConfigError`] validate loaded configuration.

pub mod dataset;
pub mod errors;
pub mod parallel;

pub use dataset::{AugmentationConfig, DatasetConfig};
pub use errors::{ConfigError, ConfigValidator};
pub use parallel::ParallelPolicy;
