//! Type definitions used across the processors module.

use image::{GrayImage, ImageBuffer, Luma};

/// Single-channel image with intensities in the unit range `[0.0, 1.0]`.
///
/// This is the working representation between normalization and persistence.
pub type UnitImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Scales an 8-bit grayscale image into the unit range.
pub fn gray_to_unit(gray: &GrayImage) -> UnitImage {
    let (width, height) = gray.dimensions();
    let data = gray.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();
    // Length always matches since it is derived from the source buffer.
    ImageBuffer::from_raw(width, height, data).unwrap_or_else(|| UnitImage::new(width, height))
}

/// Converts a unit-range image back to 8 bits.
///
/// Values are clamped to `[0, 1]`, scaled by 255 and rounded to the nearest level.
pub fn unit_to_gray(unit: &UnitImage) -> GrayImage {
    let (width, height) = unit.dimensions();
    let data = unit
        .as_raw()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    ImageBuffer::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_unit_conversion() {
        let gray = GrayImage::from_raw(3, 1, vec![0, 128, 255]).unwrap();
        let unit = gray_to_unit(&gray);
        assert_eq!(unit.get_pixel(0, 0)[0], 0.0);
        assert!((unit.get_pixel(1, 0)[0] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(unit.get_pixel(2, 0)[0], 1.0);

        let back = unit_to_gray(&unit);
        assert_eq!(back.as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn test_unit_to_gray_clamps() {
        let unit = UnitImage::from_raw(2, 1, vec![-0.5, 1.7]).unwrap();
        let gray = unit_to_gray(&unit);
        assert_eq!(gray.as_raw(), &vec![0, 255]);
    }
}
