//! Constants used throughout the dataset pipeline.
//!
//! These are the defaults for [`DatasetConfig`](crate::core::config::DatasetConfig);
//! every value here can be overridden through configuration.

/// Number of vowel inflections (barakhadi forms) created per consonant.
pub const DEFAULT_INFLECTION_COUNT: usize = 12;

/// Maximum number of exemplar slots kept per class before extraction.
pub const DEFAULT_SLOT_CAPACITY: usize = 10;

/// Canonical (width, height) of a normalized image.
pub const DEFAULT_TARGET_RESOLUTION: (u32, u32) = (224, 224);

/// Resolution at which source document pages are rasterized.
pub const DEFAULT_EXTRACTION_DPI: u32 = 300;

/// PDF user space units per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Neighborhood size of the Gaussian adaptive threshold.
pub const DEFAULT_THRESHOLD_BLOCK_SIZE: u32 = 11;

/// Constant subtracted from the weighted neighborhood mean when thresholding.
pub const DEFAULT_THRESHOLD_OFFSET: f32 = 2.0;

/// Upper bound of the random rotation, in degrees, applied in both directions.
pub const DEFAULT_MAX_ROTATION_DEG: f32 = 10.0;

/// Upper bound of the random translation, in pixels, applied on each axis.
pub const DEFAULT_MAX_SHIFT_PX: i32 = 5;

/// Probability of the extra blur pass during augmentation.
pub const DEFAULT_BLUR_PROBABILITY: f64 = 0.3;

/// Top-level category directory for vowels.
pub const VOWELS_DIR: &str = "vowels";

/// Top-level category directory for numerals.
pub const NUMERALS_DIR: &str = "numerals";

/// Top-level category directory for punctuation marks.
pub const PUNCTUATION_DIR: &str = "punctuation";

/// File name of the document manifest written into a source folder.
pub const DOCUMENT_MANIFEST_FILE: &str = "pdf_files_list.json";

/// File extensions the orchestrator treats as stored images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Classes directory relative to the storage root.
pub const DEFAULT_CLASSES_SUBDIR: &str = "data/01_raw/chars";
