//! Gaussian smoothing with replicate-edge borders.
//!
//! Convolution is done by `imageproc`, which clamps samples to the nearest
//! edge pixel.
//!
//! Kernels follow the usual convention for a non-positive sigma: sizes up to 7
//! use the fixed binomial taps, larger sizes derive sigma from the kernel size.

use imageproc::filter::separable_filter_equal;

use super::types::UnitImage;
use crate::core::errors::{DatasetError, DatasetResult};

/// Binomial taps used when sigma is not given and the kernel is small.
const SMALL_GAUSSIAN_TAPS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Builds a normalized 1-D Gaussian kernel.
///
/// # Arguments
///
/// * `ksize` - Kernel length; must be odd.
/// * `sigma` - Standard deviation. When `<= 0` it is derived from `ksize`
///   as `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
///
/// # Errors
///
/// Returns `DatasetError::InvalidInput` if `ksize` is zero or even.
pub fn gaussian_kernel(ksize: usize, sigma: f32) -> DatasetResult<Vec<f32>> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(DatasetError::invalid_input(format!(
            "Gaussian kernel size must be odd, got {ksize}"
        )));
    }

    if sigma <= 0.0 && ksize <= 7 {
        return Ok(SMALL_GAUSSIAN_TAPS[ksize / 2].to_vec());
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (ksize / 2) as f32;
    let scale = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let d = i as f32 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    Ok(kernel)
}

/// Applies a 3x3 Gaussian blur with replicate-edge borders.
pub fn gaussian_blur_3x3(image: &UnitImage) -> DatasetResult<UnitImage> {
    let kernel = gaussian_kernel(3, 0.0)?;
    Ok(separable_filter_equal(image, &kernel))
}
