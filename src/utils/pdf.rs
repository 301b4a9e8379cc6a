//! PDF page rasterization using the pure Rust `hayro` library.
//!
//! [`PageRenderer`] is the seam the extractor depends on; [`HayroRenderer`] is
//! the production implementation.

use std::path::Path;
use std::sync::Arc;

use hayro::Pdf;
use image::RgbImage;
use tracing::debug;

use crate::core::constants::PDF_POINTS_PER_INCH;
use crate::core::errors::{DatasetError, DatasetResult};

/// Rasterizes every page of a document, in document order.
pub trait PageRenderer: Send + Sync {
    /// Renders all pages of `path` at `dpi`.
    ///
    /// The returned vector holds one image per page, index 0 being page 1.
    fn render_pages(&self, path: &Path, dpi: u32) -> DatasetResult<Vec<RgbImage>>;
}

/// PDF document handler that provides in-memory page rendering.
pub struct PdfDocument {
    pdf: Pdf,
    page_count: usize,
}

impl PdfDocument {
    /// Opens a PDF file from the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::from_bytes(path, data)
    }

    /// Parses a PDF held in memory. `path` is only used for error messages.
    pub fn from_bytes(path: &Path, data: Vec<u8>) -> DatasetResult<Self> {
        let pdf = Pdf::new(Arc::new(data))
            .map_err(|e| DatasetError::pdf(path, format!("failed to parse PDF: {:?}", e)))?;
        let page_count = pdf.pages().len();
        Ok(Self { pdf, page_count })
    }

    /// Returns the number of pages in the PDF.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Renders one page (1-based) at the given resolution.
    pub fn render_page(&self, page_num: usize, dpi: u32) -> DatasetResult<RgbImage> {
        use hayro::RenderSettings;

        if page_num < 1 || page_num > self.page_count {
            return Err(DatasetError::invalid_input(format!(
                "page {} not found, document has {} pages",
                page_num, self.page_count
            )));
        }

        let page = self.pdf.pages().get(page_num - 1).ok_or_else(|| {
            DatasetError::invalid_input(format!("failed to get page {}", page_num))
        })?;

        let media_box = page.media_box();
        let width = (media_box.x1 - media_box.x0) as f32;
        let height = (media_box.y1 - media_box.y0) as f32;
        if width <= 0.0 || height <= 0.0 {
            return Err(DatasetError::invalid_input(format!(
                "invalid page size: {}x{}",
                width, height
            )));
        }

        let scale = dpi as f32 / PDF_POINTS_PER_INCH;
        let settings = RenderSettings {
            x_scale: scale,
            y_scale: scale,
            ..Default::default()
        };
        let interpreter_settings = hayro::InterpreterSettings::default();
        let pixmap = hayro::render(page, &interpreter_settings, &settings);

        // RGBA -> RGB
        let rgba_data = pixmap.data_as_u8_slice();
        let mut rgb_data =
            Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
        for chunk in rgba_data.chunks(4) {
            rgb_data.extend_from_slice(&chunk[..3]);
        }

        RgbImage::from_raw(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            rgb_data,
        )
        .ok_or_else(|| DatasetError::invalid_input("failed to convert pixmap to image"))
    }

    /// Renders all pages in order.
    pub fn render_all(&self, dpi: u32) -> DatasetResult<Vec<RgbImage>> {
        (1..=self.page_count)
            .map(|page_num| self.render_page(page_num, dpi))
            .collect()
    }
}

/// Renders PDF pages with `hayro`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HayroRenderer;

impl PageRenderer for HayroRenderer {
    fn render_pages(&self, path: &Path, dpi: u32) -> DatasetResult<Vec<RgbImage>> {
        let document = PdfDocument::open(path)?;
        debug!(
            "Rendering {} pages of {} at {} dpi",
            document.page_count(),
            path.display(),
            dpi
        );
        document.render_all(dpi)
    }
}

/// Checks if a file is a PDF based on its extension.
pub fn is_pdf_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_file() {
        assert!(is_pdf_file("ka.pdf"));
        assert!(is_pdf_file("KA.PDF"));
        assert!(!is_pdf_file("ka_1.png"));
        assert!(!is_pdf_file("ka"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = HayroRenderer.render_pages(Path::new("/nonexistent/ka.pdf"), 300);
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }
}
