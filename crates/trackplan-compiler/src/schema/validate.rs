//! Structural validation of schema sources.
//!
//! The validator is a plain value constructed by the caller and passed into
//! the generator; there are no module-level validator instances. Checks are
//! structural only; nothing here compares schema versions or semantics.

use std::collections::BTreeSet;

use crate::diagnostic::GeneratorError;
use crate::lockfile::entry::SourceSet;
use crate::schema::model::{dimension_name, SchemaBundle};

/// Structural validator for the sources of one generation target.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    /// Reject events that declare no properties at all.
    pub require_properties: bool,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the sources to typed form and checks their structure.
    pub fn validate(&self, sources: &SourceSet) -> Result<SchemaBundle, GeneratorError> {
        let bundle = SchemaBundle::from_sources(sources)?;
        let events_file = &sources.events.file;

        let mut seen = BTreeSet::new();
        for event in &bundle.events.events {
            if event.name.trim().is_empty() {
                return Err(GeneratorError::InvalidSourceShape {
                    file: events_file.clone(),
                    message: "event with an empty name".to_string(),
                });
            }
            if !seen.insert(event.name.clone()) {
                return Err(GeneratorError::DuplicateEvent {
                    name: event.name.clone(),
                    file: events_file.clone(),
                });
            }
            if self.require_properties && event.merged_properties(&bundle.groups).is_empty() {
                return Err(GeneratorError::InvalidSourceShape {
                    file: events_file.clone(),
                    message: format!("event '{}' declares no properties", event.name),
                });
            }

            for (property, definition) in &event.properties {
                if definition.typ.as_deref().is_some_and(|t| t.trim().is_empty()) {
                    return Err(GeneratorError::InvalidSourceShape {
                        file: events_file.clone(),
                        message: format!(
                            "property '{property}' of event '{}' has an empty type",
                            event.name
                        ),
                    });
                }
            }
        }

        for entry in &bundle.dimensions {
            if dimension_name(entry).is_none() {
                let file = sources
                    .dimensions
                    .as_deref()
                    .and_then(|d| d.first())
                    .map(|s| s.file.clone())
                    .unwrap_or_default();
                return Err(GeneratorError::InvalidSourceShape {
                    file,
                    message: "dimension entry without a name".to_string(),
                });
            }
        }

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockfile::source::SchemaSource;
    use serde_json::json;

    fn sources(events: serde_json::Value) -> SourceSet {
        SourceSet {
            events: SchemaSource {
                file: "events.json".to_string(),
                data: events,
                hash: "0".repeat(16),
            },
            groups: None,
            dimensions: None,
            meta: None,
        }
    }

    #[test]
    fn test_valid_sources_pass() {
        let bundle = SchemaValidator::new()
            .validate(&sources(json!({
                "events": [
                    {"name": "Signed Up", "properties": {"plan": {"type": "string"}}},
                    {"name": "Page Viewed"}
                ]
            })))
            .unwrap();
        assert_eq!(bundle.events.events.len(), 2);
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let err = SchemaValidator::new()
            .validate(&sources(json!({
                "events": [{"name": "Signed Up"}, {"name": "Signed Up"}]
            })))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::DuplicateEvent { .. }));
    }

    #[test]
    fn test_empty_event_name_rejected() {
        let err = SchemaValidator::new()
            .validate(&sources(json!({"events": [{"name": "  "}]})))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidSourceShape { .. }));
    }

    #[test]
    fn test_require_properties_mode() {
        let validator = SchemaValidator {
            require_properties: true,
        };
        let err = validator
            .validate(&sources(json!({"events": [{"name": "Bare"}]})))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidSourceShape { .. }));
    }

    #[test]
    fn test_nameless_dimension_rejected() {
        let mut set = sources(json!({"events": []}));
        set.dimensions = Some(vec![SchemaSource {
            file: "dimensions.json".to_string(),
            data: json!({"dimensions": [{"label": "no name"}]}),
            hash: "0".repeat(16),
        }]);

        let err = SchemaValidator::new().validate(&set).unwrap_err();
        match err {
            GeneratorError::InvalidSourceShape { file, .. } => {
                assert_eq!(file, "dimensions.json")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
