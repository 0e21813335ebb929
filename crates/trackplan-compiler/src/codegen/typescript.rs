//! TypeScript module generation.
//!
//! Emits one property interface per event, a const list of event names,
//! and a name-to-properties map type that typed tracking wrappers can
//! index into.

use crate::schema::model::{dimension_name, PropertyDef, SchemaBundle};

/// Generates the full TypeScript module for a bundle.
pub fn generate_module(bundle: &SchemaBundle) -> String {
    let mut out = String::new();
    out.push_str("// Generated by trackplan. Do not edit.\n\n");

    // Property interfaces
    for event in &bundle.events.events {
        let properties = event.merged_properties(&bundle.groups);
        let interface = interface_name(&event.name);

        if let Some(description) = &event.description {
            out.push_str(&format!("/** {} */\n", description.trim()));
        }
        if properties.is_empty() {
            out.push_str(&format!(
                "export type {interface} = Record<string, never>;\n\n"
            ));
            continue;
        }

        out.push_str(&format!("export interface {interface} {{\n"));
        for (name, property) in &properties {
            let optional = if property.required { "" } else { "?" };
            out.push_str(&format!(
                "  {}{optional}: {};\n",
                property_key(name),
                ts_type(property)
            ));
        }
        out.push_str("}\n\n");
    }

    // Event name list
    out.push_str("export const TRACKPLAN_EVENTS = [\n");
    for event in &bundle.events.events {
        out.push_str(&format!("  {},\n", quote(&event.name)));
    }
    out.push_str("] as const;\n\n");
    out.push_str("export type TrackplanEventName = (typeof TRACKPLAN_EVENTS)[number];\n\n");

    // Name-to-properties map
    out.push_str("export interface TrackplanEventMap {\n");
    for event in &bundle.events.events {
        out.push_str(&format!(
            "  {}: {};\n",
            quote(&event.name),
            interface_name(&event.name)
        ));
    }
    out.push_str("}\n");

    // Dimensions, when configured
    let dimensions: Vec<&str> = bundle
        .dimensions
        .iter()
        .filter_map(dimension_name)
        .collect();
    if !dimensions.is_empty() {
        out.push_str("\nexport const TRACKPLAN_DIMENSIONS = [\n");
        for dimension in dimensions {
            out.push_str(&format!("  {},\n", quote(dimension)));
        }
        out.push_str("] as const;\n");
    }

    out
}

/// The interface name for an event: PascalCase words plus `Properties`.
fn interface_name(event: &str) -> String {
    let mut pascal = String::new();
    for word in event.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            pascal.extend(first.to_uppercase());
            pascal.push_str(chars.as_str());
        }
    }
    if pascal.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        pascal.insert(0, '_');
    }
    if pascal.is_empty() {
        pascal.push_str("Unnamed");
    }
    format!("{pascal}Properties")
}

/// A property key, quoted when it is not a valid TypeScript identifier.
fn property_key(name: &str) -> String {
    let plain = !name.is_empty()
        && !name.chars().next().is_some_and(|c| c.is_ascii_digit())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        quote(name)
    }
}

/// The TypeScript type for a property declaration.
fn ts_type(property: &PropertyDef) -> String {
    match property.typ.as_deref() {
        Some("string") => "string".to_string(),
        Some("number") | Some("integer") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("array") => {
            let item = property
                .extra
                .get("items")
                .and_then(|i| i.get("type"))
                .and_then(|t| t.as_str());
            match item {
                Some("string") => "string[]".to_string(),
                Some("number") | Some("integer") => "number[]".to_string(),
                Some("boolean") => "boolean[]".to_string(),
                _ => "unknown[]".to_string(),
            }
        }
        Some("object") => "Record<string, unknown>".to_string(),
        _ => "unknown".to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
