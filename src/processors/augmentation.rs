//! Randomized augmentation applied after normalization.
//!
//! Each call draws fresh parameters from the caller's random generator, so two
//! calls on the same input are expected to differ. Pass a seeded generator to
//! reproduce a run.

use rand::Rng;
use tracing::debug;

use super::filter::gaussian_blur_3x3;
use super::types::UnitImage;
use super::warp::{rotation_matrix, translation_matrix, warp_affine};
use crate::core::config::AugmentationConfig;
use crate::core::errors::DatasetResult;

/// Parameters drawn for one augmentation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentationParams {
    /// Rotation about the image center, in degrees.
    pub angle_deg: f32,
    /// Horizontal shift in pixels.
    pub shift_x: i32,
    /// Vertical shift in pixels.
    pub shift_y: i32,
    /// Whether the extra blur pass runs.
    pub blur: bool,
}

impl AugmentationParams {
    /// Parameters that leave the image unchanged.
    pub fn identity() -> Self {
        Self {
            angle_deg: 0.0,
            shift_x: 0,
            shift_y: 0,
            blur: false,
        }
    }
}

/// Applies small rotation, shift and blur perturbations.
#[derive(Debug, Clone, Default)]
pub struct AugmentImage {
    config: AugmentationConfig,
}

impl AugmentImage {
    /// Creates an augmenter with the given bounds.
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    /// Returns the configured bounds.
    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// Draws one set of parameters within the configured bounds.
    pub fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> AugmentationParams {
        let max_angle = self.config.max_rotation_deg;
        let max_shift = self.config.max_shift_px;
        AugmentationParams {
            angle_deg: rng.gen_range(-max_angle..=max_angle),
            shift_x: rng.gen_range(-max_shift..=max_shift),
            shift_y: rng.gen_range(-max_shift..=max_shift),
            blur: rng.gen_bool(self.config.blur_probability),
        }
    }

    /// Applies the given parameters: rotate, then shift, then optionally blur.
    ///
    /// Borders replicate the nearest edge pixel. Output dimensions always
    /// equal input dimensions.
    pub fn apply_params(
        &self,
        image: &UnitImage,
        params: &AugmentationParams,
    ) -> DatasetResult<UnitImage> {
        let (width, height) = image.dimensions();
        let center = (width as f32 / 2.0, height as f32 / 2.0);

        let rotated = warp_affine(image, &rotation_matrix(center.0, center.1, params.angle_deg))?;
        let shifted = warp_affine(
            &rotated,
            &translation_matrix(params.shift_x as f32, params.shift_y as f32),
        )?;

        if params.blur {
            gaussian_blur_3x3(&shifted)
        } else {
            Ok(shifted)
        }
    }

    /// Draws parameters from `rng` and applies them.
    pub fn apply<R: Rng + ?Sized>(&self, image: &UnitImage, rng: &mut R) -> DatasetResult<UnitImage> {
        let params = self.sample_params(rng);
        debug!(
            "Augmenting: angle={:.2} shift=({}, {}) blur={}",
            params.angle_deg, params.shift_x, params.shift_y, params.blur
        );
        self.apply_params(image, &params)
    }
}
