//! Lock entries for generation targets.
//!
//! One [`GenerationEntry`] is recorded per configured output. The entry hash
//! covers the target configuration (with `output` stripped, so renaming the
//! output file never changes the hash) plus every source it reads. Optional
//! sources that are absent are omitted from the record entirely, never
//! stored as empty lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GenerateTarget;
use crate::diagnostic::GeneratorError;
use crate::lockfile::hash;
use crate::lockfile::source::{SchemaSource, SchemaSourceReader};
use crate::lockfile::version::{self, Version};

/// The sources recorded for one generation target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSet {
    /// The events schema. Always present.
    pub events: SchemaSource,

    /// Property group schemas, in configuration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<SchemaSource>>,

    /// Dimension schemas, in configuration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<SchemaSource>>,

    /// The meta rules schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SchemaSource>,
}

/// One lock-file record per generation target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationEntry {
    /// Output path as configured.
    pub output: String,

    /// Generation configuration with the `output` field removed.
    pub config: Value,

    /// The schema sources this target reads.
    pub sources: SourceSet,

    /// Content hash over `{config, sources}`.
    pub hash: String,

    /// Version relative to the prior entry with the same output.
    pub version: Version,
}

/// Builds lock entries from generation targets.
pub struct GenerationEntryBuilder<'a> {
    reader: &'a SchemaSourceReader,
}

impl<'a> GenerationEntryBuilder<'a> {
    pub fn new(reader: &'a SchemaSourceReader) -> Self {
        Self { reader }
    }

    /// Builds the entry for one target, negotiating its version against the
    /// matching entry of the previously written lock file (if any).
    pub fn build(
        &self,
        target: &GenerateTarget,
        existing: Option<&GenerationEntry>,
    ) -> Result<GenerationEntry, GeneratorError> {
        let events_file =
            target
                .events
                .as_deref()
                .ok_or_else(|| GeneratorError::MissingRequiredSource {
                    output: target.output.clone(),
                })?;

        let sources = SourceSet {
            events: self.reader.read(events_file)?,
            groups: self.read_optional_list(&target.groups)?,
            dimensions: self.read_optional_list(&target.dimensions)?,
            meta: match &target.meta {
                Some(file) => self.read_optional(file)?,
                None => None,
            },
        };

        let config = config_without_output(target)?;

        let sources_value =
            serde_json::to_value(&sources).map_err(|e| GeneratorError::UnserializableContent {
                detail: e.to_string(),
            })?;
        let shell = serde_json::json!({
            "config": config,
            "sources": sources_value,
        });
        let hash = hash::digest_value(&shell);

        let version = version::negotiate(
            existing.map(|e| (e.hash.as_str(), e.version)),
            &hash,
        );

        Ok(GenerationEntry {
            output: target.output.clone(),
            config,
            sources,
            hash,
            version,
        })
    }

    /// Reads a configured list of optional sources.
    ///
    /// Missing files are logged and skipped; parse failures are fatal even
    /// for optional sources. A list with nothing readable collapses to
    /// `None` so it disappears from the record.
    fn read_optional_list(
        &self,
        files: &[String],
    ) -> Result<Option<Vec<SchemaSource>>, GeneratorError> {
        let mut sources = Vec::new();
        for file in files {
            if let Some(source) = self.read_optional(file)? {
                sources.push(source);
            }
        }
        Ok(if sources.is_empty() { None } else { Some(sources) })
    }

    fn read_optional(&self, file: &str) -> Result<Option<SchemaSource>, GeneratorError> {
        if !self.reader.resolve(file).is_file() {
            eprintln!("warning: optional schema file '{file}' not found, skipping");
            return Ok(None);
        }
        self.reader.read(file).map(Some)
    }
}

/// The target configuration as recorded in the lock entry: everything the
/// user wrote, minus the output path.
fn config_without_output(target: &GenerateTarget) -> Result<Value, GeneratorError> {
    let mut value =
        serde_json::to_value(target).map_err(|e| GeneratorError::UnserializableContent {
            detail: e.to_string(),
        })?;
    if let Value::Object(map) = &mut value {
        map.remove("output");
    }
    Ok(value)
}
