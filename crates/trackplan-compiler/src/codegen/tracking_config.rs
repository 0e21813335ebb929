//! Normalized tracking-config generation.
//!
//! Emits the merged plan as canonicalized JSON: group properties folded
//! into each event, dimensions and meta rules carried through verbatim.
//! Other tools consume this file, so the output is pretty-printed with
//! sorted keys for stable diffs.

use serde_json::{json, Map, Value};

use crate::lockfile::hash;
use crate::schema::model::SchemaBundle;

/// Generates the tracking-config JSON text for a bundle.
pub fn generate_config(bundle: &SchemaBundle, plan_name: Option<&str>) -> String {
    let mut root = Map::new();
    if let Some(name) = plan_name {
        root.insert("name".to_string(), json!(name));
    }

    let events: Vec<Value> = bundle
        .events
        .events
        .iter()
        .map(|event| {
            let mut entry = Map::new();
            entry.insert("name".to_string(), json!(event.name));
            if let Some(description) = &event.description {
                entry.insert("description".to_string(), json!(description));
            }

            let properties = event.merged_properties(&bundle.groups);
            if !properties.is_empty() {
                // serde_json::to_value on a BTreeMap cannot fail
                entry.insert(
                    "properties".to_string(),
                    serde_json::to_value(&properties).unwrap_or(Value::Null),
                );
            }
            for (key, value) in &event.extra {
                entry.insert(key.clone(), value.clone());
            }
            Value::Object(entry)
        })
        .collect();
    root.insert("events".to_string(), Value::Array(events));

    if !bundle.dimensions.is_empty() {
        root.insert("dimensions".to_string(), json!(bundle.dimensions));
    }
    if let Some(meta) = &bundle.meta {
        root.insert("meta".to_string(), meta.clone());
    }

    let canonical = hash::canonicalize(&Value::Object(root));
    let mut text = serde_json::to_string_pretty(&canonical).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}
