//! Hashing System - SHA-256 Composition Fingerprints
//!
//! The fingerprint ties a publish manifest to the exact layout that was
//! validated. The stored validation snapshot is not part of it.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::composition::Composition;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Fingerprint of a composition's content, excluding its validation snapshot.
pub fn composition_fingerprint(composition: &Composition) -> Result<String, serde_json::Error> {
    let content = Composition {
        validation: None,
        ..composition.clone()
    };
    Ok(sha256_hex(canonical_json(&content)?.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"b": 1, "a": 2}});
        assert_eq!(canonical_json(&obj).unwrap(), r#"{"a":2,"m":{"a":2,"b":1},"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_ignores_validation_snapshot() {
        let comp = Composition::new("hero", 1200, 630);
        let stamped = comp.with_validation(validate(&comp));
        assert_eq!(
            composition_fingerprint(&comp).unwrap(),
            composition_fingerprint(&stamped).unwrap()
        );

        let resized = Composition { canvas_width: 1201, ..comp.clone() };
        assert_ne!(
            composition_fingerprint(&comp).unwrap(),
            composition_fingerprint(&resized).unwrap()
        );
    }
}
