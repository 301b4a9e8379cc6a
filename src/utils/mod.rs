//! Utility functions for the dataset pipeline.
//!
//! This module provides image loading and atomic saving, PDF page rendering,
//! and logging setup.

pub mod image;
pub mod pdf;

pub use self::image::{is_image_file, load_image, save_image_atomic};
pub use pdf::{HayroRenderer, PageRenderer, PdfDocument, is_pdf_file};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// When `RUST_LOG` is unset, `default_directive` (for example `"info"`) is used.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
