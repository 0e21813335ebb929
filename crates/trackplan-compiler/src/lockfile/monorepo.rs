//! Monorepo lock-file aggregation.
//!
//! Consolidates the per-package lock files written by the generation
//! command into one root lock file. Discovery walks the tree below the
//! monorepo root; the root's own lock file is an output of this command,
//! not an input, and is never collected. A lock file without a sibling
//! package manifest is a structural violation and fails the whole run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::diagnostic::GeneratorError;
use crate::lockfile::hash;
use crate::lockfile::lock::{write_json_file, LOCK_FILE_NAME};
use crate::lockfile::version::{self, Version};
use crate::manifest;

/// Directory names never descended into during discovery.
const DEPENDENCY_DIR: &str = "node_modules";

/// One package's contribution to the monorepo lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonorepoPackage {
    /// Package name from its manifest, or the directory name.
    #[serde(rename = "packageName")]
    pub package_name: String,

    /// Package version from its manifest, or `"0.0.0"`.
    #[serde(rename = "packageVersion")]
    pub package_version: String,

    /// Lock-file path relative to the monorepo root.
    pub file: String,

    /// The package's lock-file content, verbatim.
    pub data: Value,
}

/// The consolidated root lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonorepoLockFile {
    /// Content hash over `{toolVersion, isMonoRepo, packages}`.
    pub hash: String,

    /// Highest tool version seen across the packages.
    #[serde(rename = "toolVersion")]
    pub tool_version: String,

    /// Lock version, negotiated against the prior root lock file.
    pub version: Version,

    /// Marks this lock file as a monorepo aggregate.
    #[serde(rename = "isMonoRepo")]
    pub is_mono_repo: bool,

    /// Packages sorted by name.
    pub packages: Vec<MonorepoPackage>,
}

/// Fails unless a package manifest exists directly in the root directory.
pub fn validate_root(root: &Path) -> Result<(), GeneratorError> {
    if manifest::manifest_exists(root) {
        Ok(())
    } else {
        Err(GeneratorError::NotAMonorepoRoot {
            root: root.to_path_buf(),
        })
    }
}

/// Walks the tree below `root` and collects every package lock file.
///
/// Dependency caches and hidden directories are never entered, and
/// unreadable subtrees are skipped so one bad mount cannot abort discovery.
/// The root's own lock file is excluded. Every collected lock file must
/// have a sibling manifest.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        name != DEPENDENCY_DIR && !name.starts_with('.')
    });

    let mut locks = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Permission errors on a subtree must not abort discovery
            Err(_) => continue,
        };

        // depth 1 is a file directly in the root: the prior monorepo lock
        if entry.depth() <= 1 || !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy() != LOCK_FILE_NAME {
            continue;
        }

        let lock = entry.into_path();
        let dir = lock.parent().unwrap_or(root);
        if !manifest::manifest_exists(dir) {
            return Err(GeneratorError::OrphanLockFile { lock });
        }
        locks.push(lock);
    }

    Ok(locks)
}

/// Reads the identity of the package owning a lock file.
pub fn read_package_identity(lock_path: &Path) -> (String, String) {
    let dir = lock_path.parent().unwrap_or(Path::new("."));
    let manifest = manifest::read_manifest(dir).unwrap_or_default();

    let name = manifest.name.unwrap_or_else(|| {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let version = manifest.version.unwrap_or_else(|| "0.0.0".to_string());

    (name, version)
}

/// Loads the prior monorepo lock file at the root, defensively.
///
/// A file that fails to parse, or that lacks `isMonoRepo: true` and an
/// array of packages, is treated as absent; first-run and corrupted-file
/// cases are handled identically.
pub fn load_existing(root: &Path) -> Option<MonorepoLockFile> {
    let path = root.join(LOCK_FILE_NAME);
    let content = std::fs::read_to_string(&path).ok()?;

    let tree: Value = match serde_json::from_str(&content) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!(
                "note: existing monorepo lock '{}' failed to parse ({e}), treating as absent",
                path.display()
            );
            return None;
        }
    };

    let shape_ok = tree.get("isMonoRepo").and_then(Value::as_bool) == Some(true)
        && tree.get("packages").map(Value::is_array) == Some(true);
    if !shape_ok {
        eprintln!(
            "note: existing lock '{}' is not a monorepo lock, treating as absent",
            path.display()
        );
        return None;
    }

    serde_json::from_value(tree).ok()
}

/// Aggregates all discovered package lock files into the root lock record.
///
/// `tool_version` is only used when no package lock carries a `toolVersion`
/// of its own, so the field is never empty.
pub fn aggregate(
    root: &Path,
    existing: Option<&MonorepoLockFile>,
    tool_version: &str,
) -> Result<MonorepoLockFile, GeneratorError> {
    validate_root(root)?;

    let locks = discover(root)?;
    if locks.is_empty() {
        return Err(GeneratorError::NoPackagesFound {
            root: root.to_path_buf(),
        });
    }

    let mut highest_tool_version: Option<String> = None;
    let mut packages = Vec::with_capacity(locks.len());

    for lock_path in locks {
        let content = std::fs::read_to_string(&lock_path).map_err(|e| {
            GeneratorError::CorruptPackageLock {
                lock: lock_path.clone(),
                message: e.to_string(),
            }
        })?;
        let data: Value =
            serde_json::from_str(&content).map_err(|e| GeneratorError::CorruptPackageLock {
                lock: lock_path.clone(),
                message: e.to_string(),
            })?;

        if let Some(seen) = data.get("toolVersion").and_then(Value::as_str) {
            match &highest_tool_version {
                Some(highest) if highest.as_str() >= seen => {}
                _ => highest_tool_version = Some(seen.to_string()),
            }
        }

        let (package_name, package_version) = read_package_identity(&lock_path);
        let file = pathdiff::diff_paths(&lock_path, root)
            .unwrap_or_else(|| lock_path.clone())
            .to_string_lossy()
            .into_owned();

        packages.push(MonorepoPackage {
            package_name,
            package_version,
            file,
            data,
        });
    }

    packages.sort_by(|a, b| {
        a.package_name
            .cmp(&b.package_name)
            .then_with(|| a.file.cmp(&b.file))
    });

    let tool_version = highest_tool_version.unwrap_or_else(|| tool_version.to_string());

    let packages_value =
        serde_json::to_value(&packages).map_err(|e| GeneratorError::UnserializableContent {
            detail: e.to_string(),
        })?;
    let shell = serde_json::json!({
        "toolVersion": tool_version,
        "isMonoRepo": true,
        "packages": packages_value,
    });
    let hash = hash::digest_value(&shell);

    let version = version::negotiate(
        existing.map(|lock| (lock.hash.as_str(), lock.version)),
        &hash,
    );

    Ok(MonorepoLockFile {
        hash,
        tool_version,
        version,
        is_mono_repo: true,
        packages,
    })
}

impl MonorepoLockFile {
    /// Writes the monorepo lock file at the root, minified, atomically.
    pub fn write(&self, root: &Path) -> Result<PathBuf, GeneratorError> {
        let path = root.join(LOCK_FILE_NAME);
        write_json_file(self, &path)?;
        Ok(path)
    }
}
