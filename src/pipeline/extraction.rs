//! Page extraction and slot assignment.
//!
//! For every source document the extractor:
//! 1. finds the class directory named after the document (skips it otherwise),
//! 2. prunes the class to its slot capacity,
//! 3. renders every page in document order,
//! 4. writes page `k` into the `k`-th slot (sorted by name) as `<class>_<k>.png`,
//!    dropping pages past the last slot,
//! 5. moves the document into the class directory once every write succeeded.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::core::config::{ConfigValidator, DatasetConfig};
use crate::core::constants::DOCUMENT_MANIFEST_FILE;
use crate::core::errors::{DatasetError, DatasetResult};
use crate::pipeline::stats::RunStats;
use crate::taxonomy::{ReconcileReport, list_slot_dirs, reconcile_class};
use crate::utils::{HayroRenderer, PageRenderer, is_pdf_file, save_image_atomic};

/// One page-to-slot pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    /// 1-based page number in the source document.
    pub page_index: usize,
    /// File the page is written to.
    pub target: PathBuf,
}

/// Pairs pages with slots in order, one page per slot.
///
/// Produces `min(page_count, slots.len())` assignments; page `k` goes to
/// `slots[k - 1]` as `<base_name>_<k>.png`. `slots` must already be sorted.
pub fn assign_slots(base_name: &str, page_count: usize, slots: &[PathBuf]) -> Vec<SlotAssignment> {
    slots
        .iter()
        .take(page_count)
        .enumerate()
        .map(|(i, slot)| SlotAssignment {
            page_index: i + 1,
            target: slot.join(format!("{}_{}.png", base_name, i + 1)),
        })
        .collect()
}

/// What happened to a single extracted document.
#[derive(Debug, Clone, Default)]
pub struct DocumentOutcome {
    /// Class the document belongs to.
    pub class: String,
    /// Pages rendered from the document.
    pub pages_rendered: usize,
    /// Page images written, in page order.
    pub written: Vec<PathBuf>,
    /// Pages without a slot.
    pub pages_dropped: usize,
    /// Where the document was moved to.
    pub relocated_to: PathBuf,
    /// Result of pruning the class before writing.
    pub reconcile: ReconcileReport,
}

impl DocumentOutcome {
    fn stats(&self) -> RunStats {
        RunStats {
            documents_extracted: 1,
            documents_relocated: 1,
            pages_written: self.written.len(),
            pages_dropped: self.pages_dropped,
            slots_pruned: self.reconcile.removed.len(),
            prune_failures: self.reconcile.failed.len(),
            ..Default::default()
        }
    }
}

/// Extracts document pages into class slots.
pub struct DocumentExtractor<R: PageRenderer = HayroRenderer> {
    renderer: R,
    slot_capacity: usize,
    dpi: u32,
}

impl DocumentExtractor<HayroRenderer> {
    /// Creates an extractor rendering PDFs with `hayro`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Config` if the configuration is invalid.
    pub fn new(config: &DatasetConfig) -> DatasetResult<Self> {
        Self::with_renderer(HayroRenderer, config)
    }
}

impl<R: PageRenderer> DocumentExtractor<R> {
    /// Creates an extractor using a custom page renderer.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Config` if the configuration is invalid.
    pub fn with_renderer(renderer: R, config: &DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            slot_capacity: config.slot_capacity,
            dpi: config.extraction_dpi,
        })
    }

    /// Extracts one document into the class of the same name under `classes_root`.
    ///
    /// # Errors
    ///
    /// * `DatasetError::ClassNotFound` if there is no matching class directory.
    /// * Render, write and move errors. The document is not moved in that case.
    pub fn extract_document(
        &self,
        document: &Path,
        classes_root: &Path,
    ) -> DatasetResult<DocumentOutcome> {
        let base_name = document_stem(document)?;
        let class_dir = classes_root.join(&base_name);
        if !class_dir.is_dir() {
            return Err(DatasetError::ClassNotFound { class: base_name });
        }

        info!(
            "Processing {} -> {}",
            document.display(),
            class_dir.display()
        );

        let reconcile = reconcile_class(&class_dir, self.slot_capacity)?;
        let pages = self.renderer.render_pages(document, self.dpi)?;
        let slots = list_slot_dirs(&class_dir)?;
        let pages_rendered = pages.len();
        let assignments = assign_slots(&base_name, pages_rendered, &slots);

        let mut written = Vec::with_capacity(assignments.len());
        for (assignment, page) in assignments.into_iter().zip(pages) {
            save_image_atomic(&DynamicImage::ImageRgb8(page), &assignment.target)?;
            debug!(
                "Saved page {} -> {}",
                assignment.page_index,
                assignment.target.display()
            );
            written.push(assignment.target);
        }

        let pages_dropped = pages_rendered.saturating_sub(written.len());
        if pages_dropped > 0 {
            debug!(
                "{}: {} pages had no slot and were dropped",
                base_name, pages_dropped
            );
        }

        let file_name = document
            .file_name()
            .ok_or_else(|| DatasetError::invalid_input("document path has no file name"))?;
        let relocated_to = class_dir.join(file_name);
        move_file(document, &relocated_to)?;
        info!("Moved {} to {}", document.display(), class_dir.display());

        Ok(DocumentOutcome {
            class: base_name,
            pages_rendered,
            written,
            pages_dropped,
            relocated_to,
            reconcile,
        })
    }

    /// Extracts every document in `source_dir`.
    ///
    /// A document that fails is logged and skipped; the batch continues.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::SourceFolderNotFound` if `source_dir` is not a
    /// directory, or `DatasetError::RootNotFound` if `classes_root` is missing.
    pub fn extract_all(&self, source_dir: &Path, classes_root: &Path) -> DatasetResult<RunStats> {
        if !classes_root.is_dir() {
            return Err(DatasetError::RootNotFound {
                path: classes_root.to_path_buf(),
            });
        }

        let documents = list_documents(source_dir)?;
        if documents.is_empty() {
            warn!("No PDF files found in {}", source_dir.display());
        }

        let mut stats = RunStats::new();
        for document in &documents {
            match self.extract_document(document, classes_root) {
                Ok(outcome) => stats += outcome.stats(),
                Err(DatasetError::ClassNotFound { class }) => {
                    warn!("Skipped {}: class folder '{}' not found", document.display(), class);
                    stats.documents_skipped += 1;
                }
                Err(e) => {
                    warn!("Skipped {}: {}", document.display(), e);
                    stats.documents_skipped += 1;
                }
            }
        }
        Ok(stats)
    }
}

/// Lists the PDF documents directly inside `source_dir`, sorted by file name.
///
/// # Errors
///
/// Returns `DatasetError::SourceFolderNotFound` if `source_dir` is not a directory.
pub fn list_documents(source_dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Err(DatasetError::SourceFolderNotFound {
            path: source_dir.to_path_buf(),
        });
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_pdf_file(&path) {
            documents.push(path);
        }
    }
    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// Writes the lower-cased document names of `source_dir` as a JSON list.
///
/// The manifest lands in `source_dir` and the sorted names are returned.
pub fn write_document_manifest(source_dir: &Path) -> DatasetResult<Vec<String>> {
    let mut names = list_documents(source_dir)?
        .iter()
        .map(|p| document_stem(p).map(|s| s.to_lowercase()))
        .collect::<DatasetResult<Vec<_>>>()?;
    names.sort();

    let manifest = source_dir.join(DOCUMENT_MANIFEST_FILE);
    std::fs::write(&manifest, serde_json::to_string_pretty(&names)?)?;
    info!(
        "Document list with {} entries saved to {}",
        names.len(),
        manifest.display()
    );
    Ok(names)
}

/// Moves each document into its class directory without extracting pages.
///
/// Documents without a matching class are logged and left in place.
///
/// # Errors
///
/// Returns `DatasetError::RootNotFound` if `classes_root` is missing, or
/// `DatasetError::SourceFolderNotFound` if `source_dir` is.
pub fn file_documents(source_dir: &Path, classes_root: &Path) -> DatasetResult<RunStats> {
    if !classes_root.is_dir() {
        return Err(DatasetError::RootNotFound {
            path: classes_root.to_path_buf(),
        });
    }

    let mut stats = RunStats::new();
    for document in list_documents(source_dir)? {
        let Ok(base_name) = document_stem(&document) else {
            stats.documents_skipped += 1;
            continue;
        };
        let class_dir = classes_root.join(&base_name);
        if !class_dir.is_dir() {
            warn!(
                "Skipped {}: class folder '{}' not found",
                document.display(),
                base_name
            );
            stats.documents_skipped += 1;
            continue;
        }

        let Some(file_name) = document.file_name() else {
            stats.documents_skipped += 1;
            continue;
        };
        match move_file(&document, &class_dir.join(file_name)) {
            Ok(()) => {
                info!("Moved {} -> {}", document.display(), class_dir.display());
                stats.documents_relocated += 1;
            }
            Err(e) => {
                warn!("Failed to move {}: {}", document.display(), e);
                stats.documents_skipped += 1;
            }
        }
    }
    Ok(stats)
}

fn document_stem(path: &Path) -> DatasetResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            DatasetError::invalid_input(format!("invalid document name: {}", path.display()))
        })
}

/// Renames `from` to `to`, copying across filesystems when a rename is not possible.
fn move_file(from: &Path, to: &Path) -> DatasetResult<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}
