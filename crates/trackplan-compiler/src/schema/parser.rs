//! Schema source parsing.
//!
//! Sources are plain data files, dispatched on extension: `.json` parses as
//! JSON, `.yaml`/`.yml` parse as YAML. YAML content is deserialized
//! straight into a JSON tree so the rest of the pipeline sees one value
//! type regardless of the on-disk format.

use std::path::Path;

use serde_json::Value;

/// Parses one schema source file into a JSON tree.
///
/// Errors are returned as a list of human-readable strings; callers decide
/// how fatal a parse failure is. File existence is the caller's concern.
pub fn parse_source(path: &Path) -> Result<Value, Vec<String>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let content = std::fs::read_to_string(path).map_err(|e| vec![e.to_string()])?;

    match extension.as_str() {
        "json" => serde_json::from_str(&content).map_err(|e| vec![e.to_string()]),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| vec![e.to_string()]),
        other => Err(vec![format!(
            "unsupported schema source extension '.{other}' (expected .json, .yaml, or .yml)"
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parses_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, r#"{"events": [{"name": "Signed Up"}]}"#).unwrap();

        let tree = parse_source(&path).unwrap();
        assert_eq!(tree["events"][0]["name"], json!("Signed Up"));
    }

    #[test]
    fn test_parses_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.yaml");
        std::fs::write(&path, "events:\n  - name: Signed Up\n    properties:\n      plan:\n        type: string\n").unwrap();

        let tree = parse_source(&path).unwrap();
        assert_eq!(tree["events"][0]["name"], json!("Signed Up"));
        assert_eq!(tree["events"][0]["properties"]["plan"]["type"], json!("string"));
    }

    #[test]
    fn test_yaml_and_json_parse_to_the_same_tree() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("e.json");
        let yaml_path = dir.path().join("e.yml");
        std::fs::write(&json_path, r#"{"events": [{"name": "X", "count": 3}]}"#).unwrap();
        std::fs::write(&yaml_path, "events:\n  - name: X\n    count: 3\n").unwrap();

        assert_eq!(
            parse_source(&json_path).unwrap(),
            parse_source(&yaml_path).unwrap()
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.toml");
        std::fs::write(&path, "events = []").unwrap();

        let errors = parse_source(&path).unwrap_err();
        assert!(errors[0].contains("unsupported"));
    }

    #[test]
    fn test_malformed_json_reports_detail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{oops").unwrap();

        let errors = parse_source(&path).unwrap_err();
        assert!(!errors.is_empty());
    }
}
