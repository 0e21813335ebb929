//! Typed views over parsed schema sources.
//!
//! The lock-file subsystem treats schema content as an opaque tree; the
//! validator and the generators need shape. Unknown keys are preserved via
//! serde flatten so nothing a schema author writes is dropped on the way
//! through to generated output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diagnostic::GeneratorError;
use crate::lockfile::entry::SourceSet;
use crate::lockfile::source::SchemaSource;

/// One property declaration on an event or group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Declared type name (`string`, `number`, `integer`, `boolean`,
    /// `array`, `object`, `any`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Any further JSON-Schema keywords (`enum`, `const`, `items`, ...).
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// One tracked event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDef>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// The events source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsFile {
    #[serde(default)]
    pub events: Vec<EventDef>,
}

/// A shared property bundle applied to every event of a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDef>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// The dimensions source file. Entries may be bare names or objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionsFile {
    #[serde(default)]
    pub dimensions: Vec<Value>,
}

/// The name of a dimension entry, whichever form it uses.
pub fn dimension_name(entry: &Value) -> Option<&str> {
    entry
        .as_str()
        .or_else(|| entry.get("name").and_then(Value::as_str))
}

impl EventDef {
    /// The event's effective properties: group bundles first, the event's
    /// own declarations overriding on name collision.
    pub fn merged_properties(&self, groups: &[GroupFile]) -> BTreeMap<String, PropertyDef> {
        let mut merged = BTreeMap::new();
        for group in groups {
            for (name, property) in &group.properties {
                merged.insert(name.clone(), property.clone());
            }
        }
        for (name, property) in &self.properties {
            merged.insert(name.clone(), property.clone());
        }
        merged
    }
}

/// All sources of one generation target, in typed form.
#[derive(Debug, Clone)]
pub struct SchemaBundle {
    pub events: EventsFile,
    pub groups: Vec<GroupFile>,
    pub dimensions: Vec<Value>,
    pub meta: Option<Value>,
}

impl SchemaBundle {
    /// Converts the opaque lock-entry sources into typed form.
    pub fn from_sources(sources: &SourceSet) -> Result<Self, GeneratorError> {
        let events = typed(&sources.events)?;

        let mut groups = Vec::new();
        for source in sources.groups.as_deref().unwrap_or_default() {
            groups.push(typed::<GroupFile>(source)?);
        }

        let mut dimensions = Vec::new();
        for source in sources.dimensions.as_deref().unwrap_or_default() {
            let file: DimensionsFile = typed(source)?;
            dimensions.extend(file.dimensions);
        }

        let meta = sources.meta.as_ref().map(|source| source.data.clone());

        Ok(Self {
            events,
            groups,
            dimensions,
            meta,
        })
    }
}

fn typed<T: serde::de::DeserializeOwned>(source: &SchemaSource) -> Result<T, GeneratorError> {
    serde_json::from_value(source.data.clone()).map_err(|e| GeneratorError::InvalidSourceShape {
        file: source.file.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property(typ: &str) -> PropertyDef {
        PropertyDef {
            typ: Some(typ.to_string()),
            required: false,
            description: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_event_overrides_group_property() {
        let group = GroupFile {
            name: Some("web".to_string()),
            properties: BTreeMap::from([
                ("path".to_string(), property("string")),
                ("referrer".to_string(), property("string")),
            ]),
            extra: Map::new(),
        };
        let event = EventDef {
            name: "Page Viewed".to_string(),
            description: None,
            properties: BTreeMap::from([("path".to_string(), property("number"))]),
            extra: Map::new(),
        };

        let merged = event.merged_properties(&[group]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["path"].typ.as_deref(), Some("number"));
        assert_eq!(merged["referrer"].typ.as_deref(), Some("string"));
    }

    #[test]
    fn test_dimension_name_forms() {
        assert_eq!(dimension_name(&json!("web")), Some("web"));
        assert_eq!(dimension_name(&json!({"name": "ios"})), Some("ios"));
        assert_eq!(dimension_name(&json!(42)), None);
    }

    #[test]
    fn test_unknown_property_keys_round_trip() {
        let tree = json!({"type": "string", "enum": ["a", "b"]});
        let property: PropertyDef = serde_json::from_value(tree.clone()).unwrap();
        assert_eq!(property.extra["enum"], json!(["a", "b"]));
        assert_eq!(serde_json::to_value(&property).unwrap(), tree);
    }

    #[test]
    fn test_events_file_shape_error_names_file() {
        let sources = SourceSet {
            events: SchemaSource {
                file: "events.json".to_string(),
                data: json!({"events": "nope"}),
                hash: "0".repeat(16),
            },
            groups: None,
            dimensions: None,
            meta: None,
        };

        let err = SchemaBundle::from_sources(&sources).unwrap_err();
        match err {
            GeneratorError::InvalidSourceShape { file, .. } => assert_eq!(file, "events.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
