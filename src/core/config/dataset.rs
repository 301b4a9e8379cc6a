//! Dataset-wide configuration.
//!
//! Replaces hard-coded capacities and image constants with a single structure
//! that is handed to the taxonomy manager and the transform stages when they
//! are constructed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use super::parallel::ParallelPolicy;
use crate::core::constants::*;
use crate::core::errors::DatasetResult;

/// Parameters of the randomized augmentation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    /// Rotation angle is drawn uniformly from `[-max_rotation_deg, max_rotation_deg]`.
    pub max_rotation_deg: f32,
    /// Translation offsets are drawn uniformly from `[-max_shift_px, max_shift_px]` per axis.
    pub max_shift_px: i32,
    /// Probability of the extra 3x3 Gaussian blur pass.
    pub blur_probability: f64,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            max_rotation_deg: DEFAULT_MAX_ROTATION_DEG,
            max_shift_px: DEFAULT_MAX_SHIFT_PX,
            blur_probability: DEFAULT_BLUR_PROBABILITY,
        }
    }
}

impl ConfigValidator for AugmentationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_rotation_deg.is_finite() || self.max_rotation_deg < 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "max_rotation_deg must be a non-negative number, got {}",
                    self.max_rotation_deg
                ),
            });
        }
        if self.max_shift_px < 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("max_shift_px must be non-negative, got {}", self.max_shift_px),
            });
        }
        self.validate_probability(self.blur_probability, "blur_probability")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration shared by every stage of the dataset pipeline.
///
/// Load it from JSON with [`DatasetConfig::from_json_file`]; any field left out
/// keeps its default.
///
/// ```rust
/// use modi_dataset::core::config::DatasetConfig;
///
/// let config: DatasetConfig = serde_json::from_str(r#"{ "slot_capacity": 8 }"#).unwrap();
/// assert_eq!(config.slot_capacity, 8);
/// assert_eq!(config.inflection_count, 12);
/// assert_eq!(config.target_resolution, (224, 224));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of inflection sub-directories created per consonant.
    pub inflection_count: usize,
    /// Slot directories kept per class when reconciling before extraction.
    pub slot_capacity: usize,
    /// Canonical (width, height) of normalized images.
    pub target_resolution: (u32, u32),
    /// Rasterization resolution for source document pages.
    pub extraction_dpi: u32,
    /// Neighborhood size of the adaptive threshold. Must be odd and >= 3.
    pub threshold_block_size: u32,
    /// Constant subtracted from the weighted mean before comparing.
    pub threshold_offset: f32,
    /// Augmentation bounds.
    pub augmentation: AugmentationConfig,
    /// Orchestrator scheduling.
    pub parallel: ParallelPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            inflection_count: DEFAULT_INFLECTION_COUNT,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            target_resolution: DEFAULT_TARGET_RESOLUTION,
            extraction_dpi: DEFAULT_EXTRACTION_DPI,
            threshold_block_size: DEFAULT_THRESHOLD_BLOCK_SIZE,
            threshold_offset: DEFAULT_THRESHOLD_OFFSET,
            augmentation: AugmentationConfig::default(),
            parallel: ParallelPolicy::default(),
        }
    }
}

impl DatasetConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of inflections per consonant.
    pub fn with_inflection_count(mut self, count: usize) -> Self {
        self.inflection_count = count;
        self
    }

    /// Set the per-class slot capacity.
    pub fn with_slot_capacity(mut self, capacity: usize) -> Self {
        self.slot_capacity = capacity;
        self
    }

    /// Set the canonical output resolution.
    pub fn with_target_resolution(mut self, width: u32, height: u32) -> Self {
        self.target_resolution = (width, height);
        self
    }

    /// Set the page rasterization resolution.
    pub fn with_extraction_dpi(mut self, dpi: u32) -> Self {
        self.extraction_dpi = dpi;
        self
    }

    /// Set the augmentation bounds.
    pub fn with_augmentation(mut self, augmentation: AugmentationConfig) -> Self {
        self.augmentation = augmentation;
        self
    }

    /// Set the orchestrator scheduling policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }
}

impl ConfigValidator for DatasetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive(self.inflection_count, "inflection_count")?;
        self.validate_positive(self.slot_capacity, "slot_capacity")?;
        self.validate_image_dimensions(self.target_resolution.0, self.target_resolution.1)?;
        self.validate_positive(self.extraction_dpi as usize, "extraction_dpi")?;

        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "threshold_block_size must be odd and at least 3, got {}",
                    self.threshold_block_size
                ),
            });
        }
        if !self.threshold_offset.is_finite() {
            return Err(ConfigError::InvalidConfig {
                message: "threshold_offset must be finite".to_string(),
            });
        }

        self.augmentation.validate()?;
        self.parallel.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
