//! # trackplan compiler
//!
//! Core library for trackplan: reads declarative tracking-schema sources
//! (events, property groups, dimensions, meta rules), generates code from
//! them, and maintains content-addressed lock files that record what each
//! generation run saw.
//!
//! ## Pipeline
//!
//! ```text
//! Schema Sources (JSON/YAML)
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Parse     │  Extension-dispatched parsing into one JSON tree
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Structural checks over the typed model
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  TypeScript module / tracking-config JSON
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Lock File   │  Content hashes + negotiated versions per target
//! └──────────────┘
//! ```
//!
//! A separate entry point, [`aggregate_workspace`], consolidates the lock
//! files of every package under a monorepo root into one root lock file.

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod lockfile;
pub mod manifest;
pub mod schema;

use std::path::{Path, PathBuf};

pub use config::{GenerateTarget, GeneratorConfig, ProjectConfig, CONFIG_FILE_NAME};
pub use diagnostic::GeneratorError;
pub use lockfile::{LockFile, Version, LOCK_FILE_NAME};
pub use schema::SchemaValidator;

use lockfile::entry::GenerationEntryBuilder;
use lockfile::monorepo;
use lockfile::source::SchemaSourceReader;

/// The tool version recorded in every lock file this build writes.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs generation for one package.
pub struct Generator {
    config: GeneratorConfig,
    validator: SchemaValidator,
}

/// What happened to one generation target.
#[derive(Debug)]
pub struct TargetOutcome {
    /// Output path as configured.
    pub output: String,
    /// Version recorded in the prior lock file, if the target existed.
    pub previous: Option<Version>,
    /// Version written this run.
    pub version: Version,
    /// Whether the target's content hash changed (new targets count as
    /// changed).
    pub changed: bool,
}

/// Result of a successful generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Where the lock file was written.
    pub lock_path: PathBuf,
    /// Version of the prior lock file, if one was readable.
    pub previous: Option<Version>,
    /// Version of the lock file written this run.
    pub version: Version,
    /// Per-target outcomes, in configuration order.
    pub targets: Vec<TargetOutcome>,
}

/// Result of a successful check run.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of generation targets checked.
    pub targets: usize,
    /// Total events seen across all targets.
    pub events: usize,
}

/// Result of a successful monorepo aggregation.
#[derive(Debug)]
pub struct MonorepoReport {
    /// Where the monorepo lock file was written.
    pub lock_path: PathBuf,
    /// Number of packages aggregated.
    pub packages: usize,
    /// Version of the prior monorepo lock file, if one was readable.
    pub previous: Option<Version>,
    /// Version written this run.
    pub version: Version,
    /// Highest tool version seen across the packages.
    pub tool_version: String,
}

impl Generator {
    /// Creates a generator. The validator is supplied by the caller; the
    /// library holds no process-wide validator state.
    pub fn new(config: GeneratorConfig, validator: SchemaValidator) -> Self {
        Self { config, validator }
    }

    /// Generates all configured outputs and writes the package lock file.
    ///
    /// All sources are read, validated, and rendered before the first
    /// write, so a failed run never leaves a partially updated package.
    pub fn generate(&self) -> Result<GenerateReport, GeneratorError> {
        let reader = SchemaSourceReader::new(&self.config.package_dir);
        let builder = GenerationEntryBuilder::new(&reader);

        let lock_path = self.config.package_dir.join(LOCK_FILE_NAME);
        let existing = LockFile::load(&lock_path);

        let mut entries = Vec::new();
        let mut outputs = Vec::new();
        let mut outcomes = Vec::new();

        for target in &self.config.project.generates {
            let prior = existing.as_ref().and_then(|lock| lock.entry_for(&target.output));
            let entry = builder.build(target, prior)?;
            let bundle = self.validator.validate(&entry.sources)?;
            let rendered = codegen::generate(
                &target.output,
                &bundle,
                self.config.project.name.as_deref(),
            )?;

            outcomes.push(TargetOutcome {
                output: target.output.clone(),
                previous: prior.map(|e| e.version),
                version: entry.version,
                changed: prior.map_or(true, |e| e.hash != entry.hash),
            });
            outputs.push((self.config.package_dir.join(&target.output), rendered));
            entries.push(entry);
        }

        let lock = LockFile::assemble(
            TOOL_VERSION,
            &self.config.config_file,
            entries,
            existing.as_ref(),
        )?;

        for (path, content) in &outputs {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| GeneratorError::io(parent, e.to_string()))?;
            }
            std::fs::write(path, content).map_err(|e| GeneratorError::io(path, e.to_string()))?;
        }
        lock.write(&lock_path)?;

        Ok(GenerateReport {
            lock_path,
            previous: existing.map(|l| l.version),
            version: lock.version,
            targets: outcomes,
        })
    }

    /// Parses and validates all configured sources without writing anything.
    pub fn check(&self) -> Result<CheckReport, GeneratorError> {
        let reader = SchemaSourceReader::new(&self.config.package_dir);
        let builder = GenerationEntryBuilder::new(&reader);

        let mut events = 0;
        for target in &self.config.project.generates {
            let entry = builder.build(target, None)?;
            let bundle = self.validator.validate(&entry.sources)?;
            events += bundle.events.events.len();
        }

        Ok(CheckReport {
            targets: self.config.project.generates.len(),
            events,
        })
    }
}

/// Aggregates every package lock file under `root` into the root lock file.
pub fn aggregate_workspace(root: &Path) -> Result<MonorepoReport, GeneratorError> {
    let existing = monorepo::load_existing(root);
    let lock = monorepo::aggregate(root, existing.as_ref(), TOOL_VERSION)?;
    let lock_path = lock.write(root)?;

    Ok(MonorepoReport {
        lock_path,
        packages: lock.packages.len(),
        previous: existing.map(|l| l.version),
        version: lock.version,
        tool_version: lock.tool_version,
    })
}
