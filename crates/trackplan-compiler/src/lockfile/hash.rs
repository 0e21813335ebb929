//! Content hashing for lock files.
//!
//! Lock-file digests must be deterministic regardless of the order keys were
//! inserted in memory, so values are canonicalized (map keys re-emitted in
//! sorted order at every depth, list order preserved) before hashing. The
//! hex digest is truncated to keep lock files readable; the digest is a
//! change-detection fingerprint, not a security boundary.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::diagnostic::GeneratorError;

/// Number of hex characters kept from the full SHA-256 digest.
pub const DIGEST_LEN: usize = 16;

/// Canonicalizes a JSON value: map keys sorted at every nesting depth,
/// list order preserved, scalars unchanged.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Computes the truncated digest of an already-parsed JSON value.
pub fn digest_value(value: &Value) -> String {
    let canonical = canonicalize(value);
    // Serializing a Value cannot fail
    let bytes = canonical.to_string();

    let output = Sha256::digest(bytes.as_bytes());
    let mut rendered = String::with_capacity(output.len() * 2);
    for byte in output {
        rendered.push_str(&format!("{byte:02x}"));
    }
    rendered.truncate(DIGEST_LEN);
    rendered
}

/// Computes the truncated digest of any serializable value.
///
/// Fails only if the value cannot be represented as JSON; callers hashing
/// plain data trees can rely on this never failing.
pub fn digest<T: Serialize>(value: &T) -> Result<String, GeneratorError> {
    let tree = serde_json::to_value(value).map_err(|e| GeneratorError::UnserializableContent {
        detail: e.to_string(),
    })?;
    Ok(digest_value(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digest_length() {
        let value = json!({"a": 1});
        assert_eq!(digest_value(&value).len(), DIGEST_LEN);
    }

    #[test]
    fn test_key_order_independence() {
        let mut first = Map::new();
        first.insert("zeta".to_string(), json!(1));
        first.insert("alpha".to_string(), json!({"b": 2, "a": 1}));

        let mut second = Map::new();
        second.insert("alpha".to_string(), json!({"a": 1, "b": 2}));
        second.insert("zeta".to_string(), json!(1));

        assert_eq!(
            digest_value(&Value::Object(first)),
            digest_value(&Value::Object(second))
        );
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = json!({"outer": {"z": 1, "a": {"y": 2, "b": 3}}});
        let canonical = canonicalize(&value);
        assert_eq!(
            canonical.to_string(),
            r#"{"outer":{"a":{"b":3,"y":2},"z":1}}"#
        );
    }

    #[test]
    fn test_list_order_preserved() {
        let forward = json!({"items": [1, 2, 3]});
        let reversed = json!({"items": [3, 2, 1]});
        assert_ne!(digest_value(&forward), digest_value(&reversed));
    }

    #[test]
    fn test_same_content_same_digest() {
        let value = json!({"events": [{"name": "Page Viewed"}]});
        assert_eq!(digest_value(&value), digest_value(&value.clone()));
    }

    #[test]
    fn test_scalar_changes_digest() {
        assert_ne!(digest_value(&json!({"a": 1})), digest_value(&json!({"a": 2})));
    }

    #[test]
    fn test_digest_serializable() {
        #[derive(serde::Serialize)]
        struct Probe {
            name: &'static str,
        }

        let direct = digest_value(&json!({"name": "x"}));
        let derived = digest(&Probe { name: "x" }).unwrap();
        assert_eq!(direct, derived);
    }
}
