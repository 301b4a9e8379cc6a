//! End-to-end tests for the dataset pipeline
//!
//! Covers:
//! - Reconciling an over-full class before extraction
//! - Page-to-slot assignment and document relocation
//! - Dropping pages past the slot capacity
//! - Skipping unreadable images during batch processing
//! - Reproducible seeded runs, sequential and parallel
//!
//! PDF rendering is replaced by an in-memory renderer so no fixture
//! documents are needed.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use modi_dataset::core::{DatasetConfig, DatasetResult, ParallelPolicy};
use modi_dataset::pipeline::{DocumentExtractor, Orchestrator};
use modi_dataset::processors::NormalizeImage;
use modi_dataset::taxonomy::{Alphabet, TaxonomyManager, list_slot_dirs};
use modi_dataset::utils::PageRenderer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

/// Renders `pages` blank pages with the page number drawn as a bar width.
struct StubRenderer {
    pages: usize,
}

impl PageRenderer for StubRenderer {
    fn render_pages(&self, _path: &Path, _dpi: u32) -> DatasetResult<Vec<RgbImage>> {
        Ok((1..=self.pages)
            .map(|page| {
                let mut img = RgbImage::from_pixel(120, 160, Rgb([255, 255, 255]));
                draw_filled_rect_mut(
                    &mut img,
                    Rect::at(10, 20).of_size(5 * page as u32, 40),
                    Rgb([0, 0, 0]),
                );
                img
            })
            .collect())
    }
}

fn ka_only_alphabet() -> Alphabet {
    Alphabet {
        vowels: Vec::new(),
        consonants: vec!["ka".into()],
        numerals: Vec::new(),
        punctuation: Vec::new(),
    }
}

/// Classes root with a `ka` class holding the default 12 slots, plus a
/// source folder with `ka.pdf`.
fn setup_ka(tmp: &TempDir) -> (PathBuf, PathBuf) {
    let classes = tmp.path().join("chars");
    let source = tmp.path().join("scans");
    TaxonomyManager::new(ka_only_alphabet(), &DatasetConfig::default())
        .unwrap()
        .ensure_layout(&classes)
        .unwrap();
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("ka.pdf"), b"%PDF-stub").unwrap();
    (classes, source)
}

fn character_sample(seed: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(180, 240, Luma([250]));
    draw_filled_rect_mut(
        &mut img,
        Rect::at(30 + seed as i32, 40).of_size(60, 12),
        Luma([15]),
    );
    draw_filled_rect_mut(&mut img, Rect::at(80, 40).of_size(10, 150), Luma([15]));
    img
}

fn populate_tree(classes: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for (class, slot) in [("ka", "ka1"), ("ka", "ka2"), ("kha", "kha1")] {
        let dir = classes.join(class).join(slot);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..2u32 {
            let path = dir.join(format!("{slot}_{i}.png"));
            character_sample(i * 7).save(&path).unwrap();
            files.push(path);
        }
    }
    files
}

#[test]
fn test_extraction_reconciles_then_fills_slots() {
    let tmp = TempDir::new().unwrap();
    let (classes, source) = setup_ka(&tmp);
    let ka = classes.join("ka");
    assert_eq!(list_slot_dirs(&ka).unwrap().len(), 12);

    let config = DatasetConfig::default();
    let extractor = DocumentExtractor::with_renderer(StubRenderer { pages: 10 }, &config).unwrap();
    let stats = extractor.extract_all(&source, &classes).unwrap();

    // ka10 sorts before ka2, so ka8 and ka9 are the two slots pruned.
    let slots = list_slot_dirs(&ka).unwrap();
    assert_eq!(slots.len(), 10);
    assert!(!ka.join("ka8").exists());
    assert!(!ka.join("ka9").exists());

    for (k, slot) in slots.iter().enumerate() {
        let page = slot.join(format!("ka_{}.png", k + 1));
        assert!(page.is_file(), "missing {}", page.display());
    }

    assert!(ka.join("ka.pdf").is_file());
    assert!(!source.join("ka.pdf").exists());
    assert_eq!(stats.documents_extracted, 1);
    assert_eq!(stats.documents_relocated, 1);
    assert_eq!(stats.pages_written, 10);
    assert_eq!(stats.slots_pruned, 2);
}

#[test]
fn test_extra_pages_are_dropped_without_error() {
    let tmp = TempDir::new().unwrap();
    let (classes, source) = setup_ka(&tmp);

    let config = DatasetConfig::default();
    let extractor = DocumentExtractor::with_renderer(StubRenderer { pages: 15 }, &config).unwrap();
    let stats = extractor.extract_all(&source, &classes).unwrap();

    assert_eq!(stats.pages_written, 10);
    assert_eq!(stats.pages_dropped, 5);
    assert_eq!(stats.documents_skipped, 0);

    let written: usize = list_slot_dirs(&classes.join("ka"))
        .unwrap()
        .iter()
        .map(|slot| fs::read_dir(slot).unwrap().count())
        .sum();
    assert_eq!(written, 10);
}

#[test]
fn test_document_without_class_is_left_in_place() {
    let tmp = TempDir::new().unwrap();
    let (classes, source) = setup_ka(&tmp);
    fs::write(source.join("gha.pdf"), b"%PDF-stub").unwrap();

    let config = DatasetConfig::default();
    let extractor = DocumentExtractor::with_renderer(StubRenderer { pages: 3 }, &config).unwrap();
    let stats = extractor.extract_all(&source, &classes).unwrap();

    assert_eq!(stats.documents_extracted, 1);
    assert_eq!(stats.documents_skipped, 1);
    assert!(source.join("gha.pdf").is_file());
}

#[test]
fn test_process_tree_skips_unreadable_images() {
    let tmp = TempDir::new().unwrap();
    let classes = tmp.path().join("chars");
    let files = populate_tree(&classes);
    let corrupt = classes.join("ka/ka2/ka2_9.png");
    fs::write(&corrupt, b"not an image").unwrap();

    let orchestrator = Orchestrator::new(&DatasetConfig::default()).unwrap();
    let stats = orchestrator
        .process_tree(&classes, &mut StdRng::seed_from_u64(3))
        .unwrap();

    assert_eq!(stats.classes, 2);
    assert_eq!(stats.slots, 3);
    assert_eq!(stats.images_processed, files.len());
    assert_eq!(stats.images_skipped, 1);
    assert_eq!(stats.images_failed, 0);
    assert_eq!(fs::read(&corrupt).unwrap(), b"not an image");

    for path in &files {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (224, 224));
        assert!(matches!(img, image::DynamicImage::ImageLuma8(_)));
    }
}

#[test]
fn test_seeded_runs_match_across_scheduling() {
    let sequential = TempDir::new().unwrap();
    let parallel = TempDir::new().unwrap();
    let seq_files = populate_tree(sequential.path());
    let par_files = populate_tree(parallel.path());

    let config = DatasetConfig::default();
    Orchestrator::new(&config)
        .unwrap()
        .process_tree(sequential.path(), &mut StdRng::seed_from_u64(11))
        .unwrap();
    Orchestrator::new(&config)
        .unwrap()
        .with_parallel(ParallelPolicy::new().with_enabled(true).with_max_threads(Some(2)))
        .process_tree(parallel.path(), &mut StdRng::seed_from_u64(11))
        .unwrap();

    for (a, b) in seq_files.iter().zip(&par_files) {
        assert_eq!(
            image::open(a).unwrap().to_luma8(),
            image::open(b).unwrap().to_luma8(),
            "{} differs",
            a.display()
        );
    }
}

#[test]
fn test_normalization_keeps_strokes_dark() {
    let img = image::DynamicImage::ImageLuma8(character_sample(0));
    let normalizer = NormalizeImage::from_config(&DatasetConfig::default()).unwrap();

    let first = normalizer.apply(&img).unwrap();
    let second = normalizer.apply(&img).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.dimensions(), (224, 224));

    let min = first.pixels().map(|p| p[0]).fold(f32::INFINITY, f32::min);
    let max = first.pixels().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max);
    assert!(min < 0.5, "strokes vanished: min {min}");
    assert!(max > 0.99, "background lost: max {max}");
}
