//! Image processing for the dataset pipeline.
//!
//! # Modules
//!
//! * `filter` - Gaussian kernels and separable smoothing
//! * `threshold` - Gaussian adaptive thresholding
//! * `resize` - Area-based resizing to the canonical resolution
//! * `warp` - Affine rotation and translation with replicate borders
//! * `normalization` - The deterministic normalization chain
//! * `augmentation` - The randomized augmentation chain
//! * `types` - Type definitions used across the processors module

mod augmentation;
pub mod filter;
mod normalization;
pub mod resize;
pub mod threshold;
pub mod types;
pub mod warp;

pub use augmentation::*;
pub use filter::{gaussian_blur_3x3, gaussian_kernel};
pub use normalization::*;
pub use resize::resize_area;
pub use threshold::adaptive_threshold_gaussian;
pub use types::*;
pub use warp::{rotation_matrix, translation_matrix, warp_affine};
