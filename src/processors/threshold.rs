//! Local adaptive thresholding with a Gaussian-weighted neighborhood.

use image::GrayImage;
use imageproc::filter::separable_filter_equal;

use super::filter::gaussian_kernel;
use super::types::UnitImage;
use crate::core::errors::{DatasetError, DatasetResult};

/// Binarizes an 8-bit image against its Gaussian-weighted local mean.
///
/// A pixel becomes 255 when `src - mean > -ceil(offset)` and 0 otherwise,
/// where `mean` is the `block_size` x `block_size` Gaussian-weighted
/// neighborhood mean (replicate-edge borders) rounded to 8 bits. Dark strokes
/// on a light page therefore come out black on white.
///
/// # Arguments
///
/// * `gray` - Source image.
/// * `block_size` - Neighborhood size; must be odd and at least 3.
/// * `offset` - Constant subtracted from the local mean.
///
/// # Errors
///
/// Returns `DatasetError::InvalidInput` if `block_size` is invalid.
pub fn adaptive_threshold_gaussian(
    gray: &GrayImage,
    block_size: u32,
    offset: f32,
) -> DatasetResult<GrayImage> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(DatasetError::invalid_input(format!(
            "block size must be odd and at least 3, got {block_size}"
        )));
    }

    let (width, height) = gray.dimensions();
    let kernel = gaussian_kernel(block_size as usize, 0.0)?;
    let widened: UnitImage = UnitImage::from_fn(width, height, |x, y| {
        image::Luma([f32::from(gray.get_pixel(x, y)[0])])
    });
    let mean: UnitImage = separable_filter_equal(&widened, &kernel);

    let delta = offset.ceil() as i32;
    let data = gray
        .as_raw()
        .iter()
        .zip(mean.as_raw())
        .map(|(&src, &m)| {
            let local = m.round().clamp(0.0, 255.0) as i32;
            if i32::from(src) - local > -delta { 255 } else { 0 }
        })
        .collect();

    GrayImage::from_raw(width, height, data)
        .ok_or_else(|| DatasetError::invalid_input("threshold buffer does not match image size"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_uniform_image_turns_white() {
        let gray = GrayImage::from_pixel(20, 20, Luma([90]));
        let binary = adaptive_threshold_gaussian(&gray, 11, 2.0).unwrap();
        assert!(binary.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_dark_stroke_turns_black() {
        let mut gray = GrayImage::from_pixel(30, 30, Luma([220]));
        for y in 5..25 {
            gray.put_pixel(15, y, Luma([20]));
        }
        let binary = adaptive_threshold_gaussian(&gray, 11, 2.0).unwrap();
        assert_eq!(binary.get_pixel(15, 15)[0], 0);
        assert_eq!(binary.get_pixel(2, 2)[0], 255);
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_invalid_block_size() {
        let gray = GrayImage::new(4, 4);
        assert!(adaptive_threshold_gaussian(&gray, 10, 2.0).is_err());
        assert!(adaptive_threshold_gaussian(&gray, 1, 2.0).is_err());
    }

    #[test]
    fn test_stroke_at_border_uses_replicated_mean() {
        // A dark first column: with replicate borders its local mean stays
        // well above 20, so the column is black and the far side stays white.
        let mut gray = GrayImage::from_pixel(16, 16, Luma([200]));
        for y in 0..16 {
            gray.put_pixel(0, y, Luma([20]));
        }
        let binary = adaptive_threshold_gaussian(&gray, 11, 2.0).unwrap();
        assert!((0..16).all(|y| binary.get_pixel(0, y)[0] == 0));
        assert!((0..16).all(|y| binary.get_pixel(15, y)[0] == 255));
    }
}
