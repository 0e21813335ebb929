//! Code generation from validated schema bundles.
//!
//! Each generation target produces exactly one output file. The generator
//! is selected by the output extension: `.ts` emits a TypeScript module,
//! anything else emits normalized tracking-config JSON. Generators are
//! deterministic text transforms; all change detection lives in the
//! lock-file subsystem.

mod tracking_config;
mod typescript;

use std::path::Path;

use crate::diagnostic::GeneratorError;
use crate::schema::model::SchemaBundle;

/// Renders the output file content for one target.
pub fn generate(
    output: &str,
    bundle: &SchemaBundle,
    plan_name: Option<&str>,
) -> Result<String, GeneratorError> {
    let extension = Path::new(output)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "ts" => Ok(typescript::generate_module(bundle)),
        _ => Ok(tracking_config::generate_config(bundle, plan_name)),
    }
}
