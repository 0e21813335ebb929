//! Generator error types.

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating code or lock files.
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to read or write '{path}': {message}")]
    #[diagnostic(code(trackplan::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration file not found: {}", path.display())]
    #[diagnostic(
        code(trackplan::config::not_found),
        help("Run trackplan from the package directory, or point --config at the configuration file.")
    )]
    ConfigNotFound {
        path: PathBuf,
    },

    #[error("Failed to parse configuration file '{}': {message}", path.display())]
    #[diagnostic(code(trackplan::config::parse_failed))]
    ConfigParseFailed {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Schema Source Errors
    // =========================================================================
    #[error("Schema file not found: {}", path.display())]
    #[diagnostic(
        code(trackplan::schema::file_not_found),
        help("Source paths in the configuration are resolved relative to the package directory.")
    )]
    SchemaFileNotFound {
        path: PathBuf,
    },

    #[error("Failed to parse schema file '{}': {detail}", path.display())]
    #[diagnostic(code(trackplan::schema::parse_failed))]
    SchemaParseFailed {
        path: PathBuf,
        detail: String,
    },

    #[error("Generation target '{output}' does not declare an events file")]
    #[diagnostic(
        code(trackplan::schema::missing_required_source),
        help("Every entry in 'generates' must list an 'events' source file.")
    )]
    MissingRequiredSource {
        output: String,
    },

    #[error("Content cannot be serialized for hashing: {detail}")]
    #[diagnostic(code(trackplan::hash::unserializable_content))]
    UnserializableContent {
        detail: String,
    },

    // =========================================================================
    // Structure Errors
    // =========================================================================
    #[error("Schema file '{file}' has an invalid shape: {message}")]
    #[diagnostic(code(trackplan::validate::invalid_source_shape))]
    InvalidSourceShape {
        file: String,
        message: String,
    },

    #[error("Duplicate event '{name}' in '{file}'")]
    #[diagnostic(
        code(trackplan::validate::duplicate_event),
        help("Event names must be unique within an events file.")
    )]
    DuplicateEvent {
        name: String,
        file: String,
    },

    // =========================================================================
    // Monorepo Errors
    // =========================================================================
    #[error("Not a monorepo root: {}", root.display())]
    #[diagnostic(
        code(trackplan::monorepo::not_a_root),
        help("The aggregation command must run from a directory containing a package manifest.")
    )]
    NotAMonorepoRoot {
        root: PathBuf,
    },

    #[error("Lock file has no sibling package manifest: {}", lock.display())]
    #[diagnostic(
        code(trackplan::monorepo::orphan_lock_file),
        help("Every discovered lock file must sit next to a package.json.")
    )]
    OrphanLockFile {
        lock: PathBuf,
    },

    #[error("Failed to parse package lock file '{}': {message}", lock.display())]
    #[diagnostic(code(trackplan::monorepo::corrupt_package_lock))]
    CorruptPackageLock {
        lock: PathBuf,
        message: String,
    },

    #[error("No package lock files found under {}", root.display())]
    #[diagnostic(
        code(trackplan::monorepo::no_packages_found),
        help("Run 'trackplan generate' in at least one package before aggregating.")
    )]
    NoPackagesFound {
        root: PathBuf,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}
