//! Modi dataset builder
//!
//! Command-line front end for the dataset pipeline: lays out the class
//! taxonomy, extracts scanned PDF pages into slots, and normalizes and
//! augments the stored images.
//!
//! # Usage
//!
//! ```bash
//! modi-dataset --root <ROOT> [OPTIONS] <COMMAND>
//! ```
//!
//! # Commands
//!
//! * `init` - Create the class/slot directory tree
//! * `reconcile <CLASS>` - Prune a class down to its slot capacity
//! * `extract <SOURCE_DIR>` - Render documents into their class slots
//! * `file <SOURCE_DIR>` - Move documents into their class folders without rendering
//! * `manifest <SOURCE_DIR>` - Write `pdf_files_list.json` for a source folder
//! * `process` - Normalize and augment every stored image in place
//!
//! # Example
//!
//! ```bash
//! modi-dataset --root ~/drive/modi-script --seed 7 process --parallel
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use modi_dataset::core::constants::DEFAULT_CLASSES_SUBDIR;
use modi_dataset::pipeline::{file_documents, write_document_manifest};
use modi_dataset::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};

/// Command-line arguments for the dataset builder
#[derive(Parser)]
#[command(name = "modi-dataset")]
#[command(about = "Builds a labeled Modi-script character image dataset")]
struct Args {
    /// Storage root the dataset lives under
    #[arg(short, long, env = "MODI_DATASET_ROOT")]
    root: PathBuf,

    /// Classes directory relative to the root
    #[arg(long, default_value = DEFAULT_CLASSES_SUBDIR)]
    subdir: PathBuf,

    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON alphabet file (the built-in Modi alphabet is used when omitted)
    #[arg(long)]
    alphabet: Option<PathBuf>,

    /// Seed for reproducible augmentation
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create every missing class, slot and category directory
    Init,
    /// Prune a class directory down to the slot capacity
    Reconcile {
        /// Class name, e.g. `ka`
        class: String,
    },
    /// Render each document's pages into the slots of its class
    Extract {
        /// Folder holding the scanned PDF documents
        source_dir: PathBuf,
    },
    /// Move each document into its class folder without rendering
    File {
        /// Folder holding the scanned PDF documents
        source_dir: PathBuf,
    },
    /// Write the lower-cased document names to `pdf_files_list.json`
    Manifest {
        /// Folder holding the scanned PDF documents
        source_dir: PathBuf,
    },
    /// Normalize and augment every stored image in place
    Process {
        /// Transform images on a thread pool
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    modi_dataset::utils::init_tracing(if args.verbose { "debug" } else { "info" });

    let config = match &args.config {
        Some(path) => DatasetConfig::from_json_file(path).inspect_err(|e| {
            error!("Invalid configuration {}: {}", path.display(), e);
        })?,
        None => DatasetConfig::default(),
    };

    let root = FixedRoot::new(&args.root).resolve_root().inspect_err(|e| {
        error!("{}", e);
    })?;
    let classes_root = root.join(&args.subdir);

    let start = Instant::now();
    match args.command {
        Command::Init => {
            let alphabet = match &args.alphabet {
                Some(path) => Alphabet::from_json_file(path)?,
                None => Alphabet::default(),
            };
            let report = TaxonomyManager::new(alphabet, &config)?.ensure_layout(&classes_root)?;
            info!(
                "Created {} directories, {} already existed",
                report.created, report.existing
            );
        }
        Command::Reconcile { class } => {
            let manager = TaxonomyManager::new(Alphabet::default(), &config)?;
            let report = manager.reconcile(&classes_root.join(&class))?;
            info!(
                "{}: kept {}, removed {}, failed {}",
                class,
                report.kept.len(),
                report.removed.len(),
                report.failed.len()
            );
        }
        Command::Extract { source_dir } => {
            let stats = DocumentExtractor::new(&config)?.extract_all(&source_dir, &classes_root)?;
            info!("{}", stats);
        }
        Command::File { source_dir } => {
            let stats = file_documents(&source_dir, &classes_root)?;
            info!("{}", stats);
        }
        Command::Manifest { source_dir } => {
            let names = write_document_manifest(&source_dir)?;
            info!("Wrote {} document names", names.len());
        }
        Command::Process { parallel } => {
            let mut policy = config.parallel.clone();
            policy.enabled |= parallel;
            let orchestrator = Orchestrator::new(&config)?.with_parallel(policy);

            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let stats = orchestrator.process_tree(&classes_root, &mut rng)?;
            info!("{}", stats);
        }
    }

    info!("Finished in {:.2?}", start.elapsed());
    Ok(())
}
