//! Deterministic normalization of stored character images.
//!
//! This module turns an arbitrary scanned or rendered image into the canonical
//! form used for training: a fixed-size, binarized, single-channel image in the
//! unit float range. The chain has no random component, so the same input
//! always produces the same output.

use image::DynamicImage;
use tracing::debug;

use super::filter::gaussian_blur_3x3;
use super::resize::resize_area;
use super::threshold::adaptive_threshold_gaussian;
use super::types::{UnitImage, gray_to_unit};
use crate::core::config::DatasetConfig;
use crate::core::errors::{DatasetError, DatasetResult};

/// Normalizes images to the canonical binarized representation.
///
/// The steps run in a fixed order:
/// 1. grayscale conversion
/// 2. scaling to the unit range
/// 3. 3x3 Gaussian smoothing (replicate edges)
/// 4. conversion back to 8 bits and Gaussian adaptive thresholding
/// 5. area resize to `target_size`, stretching to fit
/// 6. scaling back to the unit range
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Output (width, height).
    pub target_size: (u32, u32),
    /// Adaptive threshold neighborhood size.
    pub block_size: u32,
    /// Adaptive threshold constant.
    pub offset: f32,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the target size has a zero dimension or the block
    /// size is not an odd number of at least 3.
    pub fn new(target_size: (u32, u32), block_size: u32, offset: f32) -> DatasetResult<Self> {
        if target_size.0 == 0 || target_size.1 == 0 {
            return Err(DatasetError::invalid_input(format!(
                "target size must be positive, got {}x{}",
                target_size.0, target_size.1
            )));
        }
        if block_size < 3 || block_size % 2 == 0 {
            return Err(DatasetError::invalid_input(format!(
                "block size must be odd and at least 3, got {block_size}"
            )));
        }
        Ok(Self {
            target_size,
            block_size,
            offset,
        })
    }

    /// Creates a normalizer from the dataset configuration.
    pub fn from_config(config: &DatasetConfig) -> DatasetResult<Self> {
        Self::new(
            config.target_resolution,
            config.threshold_block_size,
            config.threshold_offset,
        )
    }

    /// Normalizes a single image.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvalidInput` for an empty image.
    pub fn apply(&self, image: &DynamicImage) -> DatasetResult<UnitImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DatasetError::invalid_input("cannot normalize an empty image"));
        }

        let gray = image.to_luma8();
        let unit = gray_to_unit(&gray);
        let smoothed = gaussian_blur_3x3(&unit)?;

        // Truncating cast back to 8 bits.
        let (width, height) = smoothed.dimensions();
        let bytes = smoothed
            .as_raw()
            .iter()
            .map(|&v| (v * 255.0) as u8)
            .collect();
        let smoothed = image::GrayImage::from_raw(width, height, bytes)
            .ok_or_else(|| DatasetError::invalid_input("smoothed buffer does not match image size"))?;

        let binary = adaptive_threshold_gaussian(&smoothed, self.block_size, self.offset)?;
        let (target_w, target_h) = self.target_size;
        let resized = resize_area(&binary, target_w, target_h)?;

        debug!(
            "Normalized {}x{} -> {}x{}",
            width, height, target_w, target_h
        );
        Ok(gray_to_unit(&resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn glyph(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([235, 230, 225]));
        let (cx, cy) = (width / 2, height / 2);
        for y in height / 4..height * 3 / 4 {
            for dx in 0..3 {
                img.put_pixel(cx + dx, y, Rgb([30, 25, 20]));
            }
        }
        for x in width / 4..width * 3 / 4 {
            img.put_pixel(x, cy, Rgb([30, 25, 20]));
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_is_canonical_size() {
        let normalizer = NormalizeImage::from_config(&DatasetConfig::default()).unwrap();
        for (w, h) in [(100, 300), (500, 500), (64, 64)] {
            let out = normalizer.apply(&glyph(w, h)).unwrap();
            assert_eq!(out.dimensions(), (224, 224), "input {w}x{h}");
            assert!(out.pixels().all(|p| (0.0..=1.0).contains(&p[0])));
        }
    }

    #[test]
    fn test_deterministic() {
        let normalizer = NormalizeImage::from_config(&DatasetConfig::default()).unwrap();
        let input = glyph(120, 90);
        let a = normalizer.apply(&input).unwrap();
        let b = normalizer.apply(&input).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_stroke_is_dark_background_light() {
        let normalizer = NormalizeImage::new((224, 224), 11, 2.0).unwrap();
        let out = normalizer.apply(&glyph(224, 224)).unwrap();
        // Center sits on the stroke crossing, corner on blank page.
        assert!(out.get_pixel(113, 112)[0] < 0.5);
        assert_eq!(out.get_pixel(5, 5)[0], 1.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(NormalizeImage::new((0, 224), 11, 2.0).is_err());
        assert!(NormalizeImage::new((224, 224), 8, 2.0).is_err());
    }

    #[test]
    fn test_empty_image_rejected() {
        let normalizer = NormalizeImage::from_config(&DatasetConfig::default()).unwrap();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(normalizer.apply(&empty).is_err());
    }
}
