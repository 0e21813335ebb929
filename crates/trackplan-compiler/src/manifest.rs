//! Package manifest reading.
//!
//! Packages are identified by the `package.json` sitting next to their lock
//! file. Only the name and version are read; everything else in the
//! manifest is irrelevant to aggregation.

use std::path::Path;

use serde::Deserialize;

/// File name of the package manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// The fields trackplan reads from a package manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Whether a manifest file exists directly in `dir`.
pub fn manifest_exists(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE_NAME).is_file()
}

/// Reads the manifest in `dir`, or `None` if it is absent.
///
/// A manifest that exists but cannot be parsed degrades to an empty record
/// (identity fields fall back to their defaults) with an informational note.
pub fn read_manifest(dir: &Path) -> Option<PackageManifest> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let content = std::fs::read_to_string(&path).ok()?;

    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            eprintln!(
                "note: manifest '{}' failed to parse ({e}), using defaults",
                path.display()
            );
            Some(PackageManifest::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_name_and_version() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            r#"{"name": "@acme/web", "version": "2.1.0", "private": true}"#,
        )
        .unwrap();

        let manifest = read_manifest(dir.path()).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("@acme/web"));
        assert_eq!(manifest.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn test_absent_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(!manifest_exists(dir.path()));
        assert!(read_manifest(dir.path()).is_none());
    }

    #[test]
    fn test_unparseable_manifest_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{oops").unwrap();

        let manifest = read_manifest(dir.path()).unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.version.is_none());
    }
}
