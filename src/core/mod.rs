//! The core module of the dataset pipeline.
//!
//! This module contains the pieces every other module relies on:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{AugmentationConfig, ConfigError, ConfigValidator, DatasetConfig, ParallelPolicy};
pub use constants::*;
pub use errors::{DatasetError, DatasetResult, ProcessingStage};
