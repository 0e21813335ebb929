//! Schema source records.
//!
//! A [`SchemaSource`] captures one schema file at read time: the path as
//! written in the configuration, the parsed content, and its content hash.
//! Records are created fresh on every read and never mutated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostic::GeneratorError;
use crate::lockfile::hash;
use crate::schema::parser;

/// One schema file as recorded in a lock entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSource {
    /// Path as given in the configuration, not resolved.
    pub file: String,

    /// Parsed schema content.
    pub data: Value,

    /// Content hash of `data`.
    pub hash: String,
}

/// Reads schema files relative to a package directory.
pub struct SchemaSourceReader {
    base: PathBuf,
}

impl SchemaSourceReader {
    /// Creates a reader resolving paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The resolved location of a configured source path.
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.base.join(file)
    }

    /// Reads and hashes one schema file.
    pub fn read(&self, file: &str) -> Result<SchemaSource, GeneratorError> {
        let resolved = self.resolve(file);
        if !resolved.is_file() {
            return Err(GeneratorError::SchemaFileNotFound { path: resolved });
        }

        let data = parser::parse_source(&resolved).map_err(|errors| {
            GeneratorError::SchemaParseFailed {
                path: resolved.clone(),
                detail: errors.join("; "),
            }
        })?;

        let hash = hash::digest_value(&data);

        Ok(SchemaSource {
            file: file.to_string(),
            data,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_read_keeps_configured_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "events.json", r#"{"events": []}"#);

        let reader = SchemaSourceReader::new(dir.path());
        let source = reader.read("events.json").unwrap();

        assert_eq!(source.file, "events.json");
        assert_eq!(source.data["events"], serde_json::json!([]));
        assert_eq!(source.hash.len(), hash::DIGEST_LEN);
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let reader = SchemaSourceReader::new(dir.path());

        let err = reader.read("absent.json").unwrap_err();
        assert!(matches!(err, GeneratorError::SchemaFileNotFound { .. }));
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "events.json", "{not json");

        let reader = SchemaSourceReader::new(dir.path());
        let err = reader.read("events.json").unwrap_err();
        assert!(matches!(err, GeneratorError::SchemaParseFailed { .. }));
    }

    #[test]
    fn test_same_content_same_hash() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"events": [{"name": "X"}]}"#);
        write(dir.path(), "b.json", r#"{"events": [{"name": "X"}]}"#);

        let reader = SchemaSourceReader::new(dir.path());
        let a = reader.read("a.json").unwrap();
        let b = reader.read("b.json").unwrap();
        assert_eq!(a.hash, b.hash);
    }
}
