//! Generator configuration.
//!
//! The configuration is pure data loaded from `trackplan.config.json`; the
//! tool never evaluates configuration code. Unknown keys on a generation
//! target are preserved verbatim; they are generator options and
//! participate in the target's lock-entry hash.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diagnostic::GeneratorError;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "trackplan.config.json";

/// One generation target: a set of schema sources producing one output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTarget {
    /// Path of the generated file, relative to the package directory.
    pub output: String,

    /// The events schema file. Required for generation; its absence is
    /// reported when the target is built, not at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,

    /// Property group schema files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    /// Dimension schema files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,

    /// Meta rules schema file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,

    /// Generator options, carried through untouched.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

/// The package-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Optional plan name, used by the tracking-config generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Generation targets.
    pub generates: Vec<GenerateTarget>,
}

/// Everything the generator needs to run against one package.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The package directory all paths resolve against.
    pub package_dir: PathBuf,

    /// Configuration file name as recorded in the lock file.
    pub config_file: String,

    /// The parsed configuration.
    pub project: ProjectConfig,
}

impl GeneratorConfig {
    /// Loads the configuration file from a package directory.
    pub fn load(package_dir: &Path, config_file: &str) -> Result<Self, GeneratorError> {
        let path = package_dir.join(config_file);
        if !path.is_file() {
            return Err(GeneratorError::ConfigNotFound { path });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| GeneratorError::io(&path, e.to_string()))?;
        let project = serde_json::from_str(&content).map_err(|e| {
            GeneratorError::ConfigParseFailed {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            package_dir: package_dir.to_path_buf(),
            config_file: config_file.to_string(),
            project,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{
                "name": "web-plan",
                "generates": [{
                    "output": "src/tracking.ts",
                    "events": "schema/events.json",
                    "groups": ["schema/web.json"],
                    "meta": "schema/meta.yaml",
                    "strictNames": true
                }]
            }"#,
        )
        .unwrap();

        let config = GeneratorConfig::load(dir.path(), CONFIG_FILE_NAME).unwrap();
        assert_eq!(config.project.name.as_deref(), Some("web-plan"));

        let target = &config.project.generates[0];
        assert_eq!(target.output, "src/tracking.ts");
        assert_eq!(target.events.as_deref(), Some("schema/events.json"));
        assert_eq!(target.groups, vec!["schema/web.json"]);
        assert!(target.dimensions.is_empty());
        assert_eq!(target.meta.as_deref(), Some("schema/meta.yaml"));
        assert_eq!(target.options["strictNames"], json!(true));
    }

    #[test]
    fn test_missing_config_errors() {
        let dir = TempDir::new().unwrap();
        let err = GeneratorConfig::load(dir.path(), CONFIG_FILE_NAME).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_malformed_config_errors() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{nope").unwrap();
        let err = GeneratorConfig::load(dir.path(), CONFIG_FILE_NAME).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_target_serialization_omits_empty_optionals() {
        let target = GenerateTarget {
            output: "out.ts".to_string(),
            events: Some("events.json".to_string()),
            groups: Vec::new(),
            dimensions: Vec::new(),
            meta: None,
            options: Map::new(),
        };

        let tree = serde_json::to_value(&target).unwrap();
        assert_eq!(tree, json!({"output": "out.ts", "events": "events.json"}));
    }
}
