//! Package lock file assembly and persistence.
//!
//! The lock file (`trackplan.lock.json`) records a content fingerprint and
//! version for every generation target of a package. It is written as a
//! whole-file replacement on every run; downstream tooling treats it as a
//! change-detection oracle, so a prior lock file that cannot be read is
//! degraded to "absent" rather than failing the run.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;
use crate::lockfile::entry::GenerationEntry;
use crate::lockfile::hash;
use crate::lockfile::version::{self, Version};

/// File name of both the per-package and the monorepo lock file.
pub const LOCK_FILE_NAME: &str = "trackplan.lock.json";

/// The complete package lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFile {
    /// Tool version that wrote this file.
    #[serde(rename = "toolVersion")]
    pub tool_version: String,

    /// Lock version, negotiated against the prior lock file.
    pub version: Version,

    /// Content hash over `{toolVersion, configFile, generates}`.
    pub hash: String,

    /// Name of the configuration file the targets came from.
    #[serde(rename = "configFile")]
    pub config_file: String,

    /// One entry per generation target.
    pub generates: Vec<GenerationEntry>,
}

impl LockFile {
    /// Loads a prior lock file.
    ///
    /// Returns `None` if the file does not exist, and also if it exists but
    /// cannot be read or parsed; first-run and corrupted states are handled
    /// identically.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.is_file() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!(
                    "note: existing lock file '{}' is unreadable ({e}), treating as absent",
                    path.display()
                );
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(lock) => Some(lock),
            Err(e) => {
                eprintln!(
                    "note: existing lock file '{}' failed to parse ({e}), treating as absent",
                    path.display()
                );
                None
            }
        }
    }

    /// Assembles the lock file from already-built entries.
    ///
    /// The hash covers the full `{toolVersion, configFile, generates}`
    /// shell, so a version bump in any entry changes the overall hash too.
    pub fn assemble(
        tool_version: &str,
        config_file: &str,
        generates: Vec<GenerationEntry>,
        existing: Option<&LockFile>,
    ) -> Result<Self, GeneratorError> {
        let generates_value =
            serde_json::to_value(&generates).map_err(|e| GeneratorError::UnserializableContent {
                detail: e.to_string(),
            })?;
        let shell = serde_json::json!({
            "toolVersion": tool_version,
            "configFile": config_file,
            "generates": generates_value,
        });
        let hash = hash::digest_value(&shell);

        let version = version::negotiate(
            existing.map(|lock| (lock.hash.as_str(), lock.version)),
            &hash,
        );

        Ok(Self {
            tool_version: tool_version.to_string(),
            version,
            hash,
            config_file: config_file.to_string(),
            generates,
        })
    }

    /// Finds the entry for an output path.
    pub fn entry_for(&self, output: &str) -> Option<&GenerationEntry> {
        self.generates.iter().find(|e| e.output == output)
    }

    /// Writes the lock file as minified JSON, replacing any prior file.
    pub fn write(&self, path: &Path) -> Result<(), GeneratorError> {
        write_json_file(self, path)
    }
}

/// Serializes a value as minified JSON and writes it through a temp file in
/// the destination directory, renaming over the target so a crash mid-write
/// cannot leave a truncated lock file.
pub(crate) fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<(), GeneratorError> {
    let content =
        serde_json::to_string(value).map_err(|e| GeneratorError::io(path, e.to_string()))?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = dir {
        std::fs::create_dir_all(parent)
            .map_err(|e| GeneratorError::io(parent, e.to_string()))?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
        .map_err(|e| GeneratorError::io(path, e.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| GeneratorError::io(path, e.to_string()))?;
    temp.persist(path)
        .map_err(|e| GeneratorError::io(path, e.to_string()))?;

    Ok(())
}
