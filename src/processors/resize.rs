//! Area-based resizing to a fixed canonical resolution.
//!
//! Along an axis that shrinks, every destination pixel averages the source
//! pixels its footprint covers, weighted by coverage. Along an axis that grows
//! the footprint is smaller than one source pixel, so bilinear weights with
//! half-pixel centers are used instead. The aspect ratio is not preserved.

use image::GrayImage;
use rayon::prelude::*;

use crate::core::errors::{DatasetError, DatasetResult};

/// Contribution of each source index to one destination index.
type AxisWeights = Vec<Vec<(usize, f32)>>;

fn axis_weights(src_len: usize, dst_len: usize) -> AxisWeights {
    let scale = src_len as f64 / dst_len as f64;

    if scale >= 1.0 {
        (0..dst_len)
            .map(|i| {
                let start = i as f64 * scale;
                let end = start + scale;
                let first = start.floor() as usize;
                let last = (end.ceil() as usize).min(src_len);
                (first..last)
                    .filter_map(|j| {
                        let overlap = (end.min(j as f64 + 1.0) - start.max(j as f64)).max(0.0);
                        (overlap > 1e-9).then_some((j, (overlap / scale) as f32))
                    })
                    .collect()
            })
            .collect()
    } else {
        let last = src_len - 1;
        (0..dst_len)
            .map(|i| {
                let s = ((i as f64 + 0.5) * scale - 0.5).max(0.0);
                let j0 = (s.floor() as usize).min(last);
                let j1 = (j0 + 1).min(last);
                let f = (s - j0 as f64).clamp(0.0, 1.0) as f32;
                if j0 == j1 || f == 0.0 {
                    vec![(j0, 1.0)]
                } else {
                    vec![(j0, 1.0 - f), (j1, f)]
                }
            })
            .collect()
    }
}

/// Resizes a grayscale image to exactly `width` x `height`.
///
/// # Errors
///
/// Returns a resize error if the source or target has a zero dimension.
pub fn resize_area(image: &GrayImage, width: u32, height: u32) -> DatasetResult<GrayImage> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return Err(DatasetError::resize_error(
            &format!("{src_w}x{src_h} -> {width}x{height}"),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "zero-sized image"),
        ));
    }
    if (src_w, src_h) == (width, height) {
        return Ok(image.clone());
    }

    let (sw, dw, dh) = (src_w as usize, width as usize, height as usize);
    let x_weights = axis_weights(sw, dw);
    let y_weights = axis_weights(src_h as usize, dh);
    let src = image.as_raw();

    // Horizontal pass: src_h rows of dst width.
    let mut horizontal = vec![0.0f32; dw * src_h as usize];
    horizontal
        .par_chunks_mut(dw)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &src[y * sw..(y + 1) * sw];
            for (out, taps) in row.iter_mut().zip(&x_weights) {
                *out = taps.iter().map(|&(j, w)| w * f32::from(line[j])).sum();
            }
        });

    let mut output = vec![0u8; dw * dh];
    output
        .par_chunks_mut(dw)
        .zip(y_weights.par_iter())
        .for_each(|(row, taps)| {
            for (x, out) in row.iter_mut().enumerate() {
                let value: f32 = taps.iter().map(|&(j, w)| w * horizontal[j * dw + x]).sum();
                *out = value.round().clamp(0.0, 255.0) as u8;
            }
        });

    GrayImage::from_raw(width, height, output)
        .ok_or_else(|| DatasetError::invalid_input("resized buffer does not match image size"))
}
