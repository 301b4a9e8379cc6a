//! Affine warping with bilinear sampling and replicate-edge borders.
//!
//! Matrices map source coordinates to destination coordinates. Warping uses
//! inverse mapping: every destination pixel is traced back into the source and
//! sampled there, with out-of-range coordinates clamped to the nearest edge.

use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

use super::types::UnitImage;
use crate::core::errors::{DatasetError, DatasetResult};

/// Builds the matrix rotating by `angle_deg` about `(cx, cy)`.
///
/// Positive angles rotate counter-clockwise in image coordinates (y down),
/// with unit scale.
pub fn rotation_matrix(cx: f32, cy: f32, angle_deg: f32) -> Matrix3<f32> {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Matrix3::new(
        cos,
        sin,
        (1.0 - cos) * cx - sin * cy,
        -sin,
        cos,
        sin * cx + (1.0 - cos) * cy,
        0.0,
        0.0,
        1.0,
    )
}

/// Builds the matrix shifting by `(tx, ty)` pixels.
pub fn translation_matrix(tx: f32, ty: f32) -> Matrix3<f32> {
    Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0)
}

/// Applies an affine transform, keeping the image dimensions.
///
/// # Errors
///
/// Returns a warp error if the matrix cannot be inverted.
pub fn warp_affine(image: &UnitImage, transform: &Matrix3<f32>) -> DatasetResult<UnitImage> {
    let inverse = transform.try_inverse().ok_or_else(|| {
        DatasetError::warp_error(
            "affine matrix",
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "matrix is not invertible"),
        )
    })?;

    let (width, height) = image.dimensions();
    let w = width as usize;
    if w == 0 || height == 0 {
        return Ok(image.clone());
    }

    let mut output = vec![0.0f32; w * height as usize];
    output.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let src = inverse * Vector3::new(x as f32, y as f32, 1.0);
            *out = sample_replicate(image, src.x, src.y);
        }
    });

    UnitImage::from_raw(width, height, output)
        .ok_or_else(|| DatasetError::invalid_input("warped buffer does not match image size"))
}

/// Bilinear sample at fractional coordinates, clamping to the nearest edge.
fn sample_replicate(image: &UnitImage, x: f32, y: f32) -> f32 {
    let (width, height) = image.dimensions();
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x1 = x.floor() as u32;
    let y1 = y.floor() as u32;
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let dx = x - x1 as f32;
    let dy = y - y1 as f32;

    let p11 = image.get_pixel(x1, y1)[0];
    let p12 = image.get_pixel(x1, y2)[0];
    let p21 = image.get_pixel(x2, y1)[0];
    let p22 = image.get_pixel(x2, y2)[0];

    (1.0 - dx) * (1.0 - dy) * p11 + dx * (1.0 - dy) * p21 + (1.0 - dx) * dy * p12 + dx * dy * p22
}
