//! Error types for the dataset pipeline.
//!
//! This module defines the errors that can occur while building the dataset,
//! including root resolution failures, missing class directories, image
//! decoding and encoding errors, PDF rendering errors, and transform errors.
//! It also provides helper constructors that attach the failing stage and
//! some context to an underlying error.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;

/// Stage of the image transform chain in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while converting to grayscale.
    Grayscale,
    /// Error occurred during Gaussian smoothing.
    Smoothing,
    /// Error occurred during adaptive thresholding.
    Threshold,
    /// Error occurred during resizing.
    Resize,
    /// Error occurred during an affine warp (rotation or translation).
    Warp,
    /// Error occurred while writing the transformed image.
    Persist,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Grayscale => write!(f, "grayscale conversion"),
            ProcessingStage::Smoothing => write!(f, "smoothing"),
            ProcessingStage::Threshold => write!(f, "adaptive threshold"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Warp => write!(f, "warp"),
            ProcessingStage::Persist => write!(f, "persist"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors that can occur while building or transforming the dataset.
///
/// Setup errors (`RootNotFound`, `SourceFolderNotFound`, `Config`) abort a run.
/// Everything else is raised per item and the pipeline decides whether to skip.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The storage root could not be resolved.
    #[error("root not found: {}", path.display())]
    RootNotFound {
        /// The path that was expected to exist.
        path: PathBuf,
    },

    /// The folder holding the source documents does not exist.
    #[error("source folder not found: {}", path.display())]
    SourceFolderNotFound {
        /// The folder that was requested.
        path: PathBuf,
    },

    /// No class directory matches the requested class name.
    #[error("class directory not found: {class}")]
    ClassNotFound {
        /// The class name that was looked up.
        class: String,
    },

    /// Error occurred while decoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred while encoding or writing an image.
    #[error("failed to save image {}", path.display())]
    ImageSave {
        /// Destination of the failed write.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while opening or rendering a PDF document.
    #[error("pdf {}: {message}", path.display())]
    Pdf {
        /// The document being rendered.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Error occurred during an image transform.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json")]
    Json(#[from] serde_json::Error),
}

/// Convenient result alias used across the crate.
pub type DatasetResult<T> = Result<T, DatasetError>;

impl DatasetError {
    /// Creates a processing error for the given stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a processing error for resize operations.
    pub fn resize_error(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_error(ProcessingStage::Resize, context, error)
    }

    /// Creates a processing error for warp operations.
    pub fn warp_error(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::processing_error(ProcessingStage::Warp, context, error)
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an image save error for `path`.
    pub fn image_save(
        path: impl Into<PathBuf>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ImageSave {
            path: path.into(),
            source: Box::new(error),
        }
    }

    /// Creates a PDF error for `path`.
    pub fn pdf(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Pdf {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. } | Self::SourceFolderNotFound { .. } | Self::Config(_)
        )
    }
}
