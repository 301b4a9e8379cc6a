//! Utility functions for loading and saving images.
//!
//! Writes go through a temporary file in the destination directory that is
//! renamed over the target, so a reader never sees a half-written image.

use std::io::BufWriter;
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::core::constants::IMAGE_EXTENSIONS;
use crate::core::errors::{DatasetError, DatasetResult};

/// Loads an image from a file path.
///
/// # Errors
///
/// Returns `DatasetError::ImageLoad` if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> DatasetResult<DynamicImage> {
    image::open(path).map_err(DatasetError::ImageLoad)
}

/// Saves an image, replacing `path` as a whole.
///
/// The encoding follows the extension of `path` and falls back to PNG.
///
/// # Errors
///
/// Returns `DatasetError::ImageSave` if encoding or the final rename fails.
pub fn save_image_atomic(image: &DynamicImage, path: &Path) -> DatasetResult<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| DatasetError::image_save(path, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|e| DatasetError::image_save(path, e))?;
        writer
            .into_inner()
            .map_err(|e| DatasetError::image_save(path, e.into_error()))?;
    }
    tmp.persist(path)
        .map_err(|e| DatasetError::image_save(path, e.error))?;
    Ok(())
}

/// Checks if a file has one of the stored-image extensions.
pub fn is_image_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("ka_1.png"));
        assert!(is_image_file("scan.JPG"));
        assert!(!is_image_file("ka.pdf"));
        assert!(!is_image_file("notes"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyph.png");
        let gray = GrayImage::from_fn(6, 4, |x, y| Luma([(x * 40 + y) as u8]));
        save_image_atomic(&DynamicImage::ImageLuma8(gray.clone()), &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.to_luma8(), gray);
        // Only the target remains; the temporary file was renamed.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_image(&path), Err(DatasetError::ImageLoad(_))));
    }
}
