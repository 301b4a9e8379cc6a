//! Batch normalization and augmentation of every stored image.
//!
//! The orchestrator walks `<root>/<class>/<slot>/<image>` in sorted order and
//! rewrites each image through [`NormalizeImage`] then [`AugmentImage`]. The
//! rewrite is destructive: the original pixels are not kept, and running the
//! batch twice augments already augmented images. Use
//! [`Orchestrator::transform_to`] to write somewhere else instead.
//!
//! A file that cannot be decoded is logged and skipped; the walk continues.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::config::{ConfigValidator, DatasetConfig, ParallelPolicy};
use crate::core::errors::{DatasetError, DatasetResult, ProcessingStage};
use crate::pipeline::stats::RunStats;
use crate::processors::{AugmentImage, NormalizeImage, UnitImage, unit_to_gray};
use crate::taxonomy::list_slot_dirs;
use crate::utils::{is_image_file, load_image, save_image_atomic};

/// A stored image scheduled for transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    /// Class directory name.
    pub class: String,
    /// Slot directory name.
    pub slot: String,
    /// Image file.
    pub path: PathBuf,
}

/// How a single image job ended.
#[derive(Debug)]
enum JobOutcome {
    Processed,
    Unreadable(DatasetError),
    Failed(DatasetError),
}

/// Runs the normalization and augmentation stages over the taxonomy.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    normalizer: NormalizeImage,
    augmenter: AugmentImage,
    parallel: ParallelPolicy,
}

impl Orchestrator {
    /// Creates an orchestrator from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Config` if the configuration is invalid.
    pub fn new(config: &DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: NormalizeImage::from_config(config)?,
            augmenter: AugmentImage::new(config.augmentation.clone()),
            parallel: config.parallel.clone(),
        })
    }

    /// Replaces the scheduling policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs normalization then augmentation on an in-memory image.
    pub fn transform<R: Rng + ?Sized>(
        &self,
        image: &DynamicImage,
        rng: &mut R,
    ) -> DatasetResult<UnitImage> {
        let normalized = self.normalizer.apply(image)?;
        self.augmenter.apply(&normalized, rng)
    }

    /// Transforms `source` and writes the result to `target`.
    ///
    /// `source` is left untouched unless it is the same path as `target`.
    pub fn transform_to<R: Rng + ?Sized>(
        &self,
        source: &Path,
        target: &Path,
        rng: &mut R,
    ) -> DatasetResult<()> {
        let image = load_image(source)?;
        let transformed = self.transform(&image, rng)?;
        save_image_atomic(&DynamicImage::ImageLuma8(unit_to_gray(&transformed)), target)
    }

    /// Transforms the image at `path` and overwrites it with the result.
    ///
    /// This is one-way: the previous contents of `path` are lost.
    pub fn transform_and_replace<R: Rng + ?Sized>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> DatasetResult<()> {
        self.transform_to(path, path, rng)
    }

    /// Lists every stored image under `root` in walk order.
    ///
    /// Class and slot directories that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::RootNotFound` if `root` is not a directory.
    pub fn collect_jobs(&self, root: &Path) -> DatasetResult<(Vec<ImageJob>, RunStats)> {
        if !root.is_dir() {
            return Err(DatasetError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut stats = RunStats::new();
        let mut jobs = Vec::new();

        for class_dir in list_slot_dirs(root)? {
            let class = dir_name(&class_dir);
            info!("Processing class folder: {}", class);
            stats.classes += 1;

            let slots = match list_slot_dirs(&class_dir) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!("Cannot list {}: {}", class_dir.display(), e);
                    continue;
                }
            };

            for slot_dir in slots {
                let slot = dir_name(&slot_dir);
                debug!("Subfolder: {}", slot);
                stats.slots += 1;

                match list_images(&slot_dir) {
                    Ok(images) => jobs.extend(images.into_iter().map(|path| ImageJob {
                        class: class.clone(),
                        slot: slot.clone(),
                        path,
                    })),
                    Err(e) => warn!("Cannot list {}: {}", slot_dir.display(), e),
                }
            }
        }

        Ok((jobs, stats))
    }

    /// Normalizes and augments every stored image under `root`, in place.
    ///
    /// One seed per image is drawn from `rng` in walk order, so a seeded run
    /// produces the same files whether or not it runs in parallel.
    ///
    /// # Errors
    ///
    /// Only setup failures are returned (missing root, thread pool creation).
    /// Per-image failures are logged and counted.
    pub fn process_tree<R: Rng + ?Sized>(
        &self,
        root: &Path,
        rng: &mut R,
    ) -> DatasetResult<RunStats> {
        let (jobs, mut stats) = self.collect_jobs(root)?;
        info!(
            "Starting preprocessing of {} images under {}",
            jobs.len(),
            root.display()
        );

        let seeded: Vec<(ImageJob, u64)> =
            jobs.into_iter().map(|job| (job, rng.next_u64())).collect();

        let outcomes: Vec<(ImageJob, JobOutcome)> = if self.parallel.enabled {
            self.parallel
                .install(|| {
                    seeded
                        .into_par_iter()
                        .map(|(job, seed)| {
                            let outcome = self.run_job(&job, seed);
                            (job, outcome)
                        })
                        .collect()
                })
                .map_err(|e| {
                    DatasetError::processing_error(ProcessingStage::Generic, "thread pool", e)
                })?
        } else {
            seeded
                .into_iter()
                .map(|(job, seed)| {
                    let outcome = self.run_job(&job, seed);
                    (job, outcome)
                })
                .collect()
        };

        for (job, outcome) in outcomes {
            match outcome {
                JobOutcome::Processed => stats.images_processed += 1,
                JobOutcome::Unreadable(e) => {
                    warn!("Couldn't read {}, skipping: {}", job.path.display(), e);
                    stats.images_skipped += 1;
                }
                JobOutcome::Failed(e) => {
                    warn!("Failed to process {}: {}", job.path.display(), e);
                    stats.images_failed += 1;
                }
            }
        }

        info!("All images preprocessed under {}", root.display());
        Ok(stats)
    }

    fn run_job(&self, job: &ImageJob, seed: u64) -> JobOutcome {
        debug!("Processing: {}/{}/{}", job.class, job.slot, dir_name(&job.path));
        let mut rng = StdRng::seed_from_u64(seed);
        match self.transform_and_replace(&job.path, &mut rng) {
            Ok(()) => JobOutcome::Processed,
            Err(e @ DatasetError::ImageLoad(_)) => JobOutcome::Unreadable(e),
            Err(e) => JobOutcome::Failed(e),
        }
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Image files directly inside `dir`, sorted by name.
fn list_images(dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_image_file(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::fs;

    fn write_sample(path: &Path, width: u32, height: u32) {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x + y) % 7 == 0 { Luma([20]) } else { Luma([230]) }
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_transform_to_leaves_source() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("in.png");
        let target = tmp.path().join("out.png");
        write_sample(&source, 50, 80);
        let before = fs::read(&source).unwrap();

        let orchestrator = Orchestrator::new(&DatasetConfig::default()).unwrap();
        orchestrator
            .transform_to(&source, &target, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(fs::read(&source).unwrap(), before);
        let out = image::open(&target).unwrap();
        assert_eq!((out.width(), out.height()), (224, 224));
    }

    #[test]
    fn test_collect_jobs_walk_order() {
        let tmp = tempfile::tempdir().unwrap();
        for (class, slot, file) in [
            ("kha", "kha1", "kha_1.png"),
            ("ka", "ka2", "ka_2.png"),
            ("ka", "ka1", "ka_1.png"),
        ] {
            let dir = tmp.path().join(class).join(slot);
            fs::create_dir_all(&dir).unwrap();
            write_sample(&dir.join(file), 10, 10);
        }
        fs::write(tmp.path().join("ka").join("ka.pdf"), b"x").unwrap();
        fs::write(tmp.path().join("ka/ka1/notes.txt"), b"x").unwrap();

        let orchestrator = Orchestrator::new(&DatasetConfig::default()).unwrap();
        let (jobs, stats) = orchestrator.collect_jobs(tmp.path()).unwrap();
        let order: Vec<_> = jobs.iter().map(|j| dir_name(&j.path)).collect();
        assert_eq!(order, vec!["ka_1.png", "ka_2.png", "kha_1.png"]);
        assert_eq!(stats.classes, 2);
        assert_eq!(stats.slots, 3);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let orchestrator = Orchestrator::new(&DatasetConfig::default()).unwrap();
        let err = orchestrator
            .process_tree(Path::new("/no/such/root"), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DatasetConfig::default().with_target_resolution(0, 224);
        assert!(Orchestrator::new(&config).is_err());
    }
}
