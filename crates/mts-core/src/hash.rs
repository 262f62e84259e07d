//! Canonical JSON encoding and stable hashing of serializable payloads.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, MtsError};

/// Serializes a value into canonical JSON bytes (sorted object keys, no whitespace).
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, MtsError> {
    // Round-tripping through `Value` sorts map keys since serde_json uses a BTreeMap.
    let value = serde_json::to_value(value).map_err(|err| {
        MtsError::Serde(ErrorInfo::new("mts_core.canonical_encode", err.to_string()))
    })?;
    serde_json::to_vec(&value).map_err(|err| {
        MtsError::Serde(ErrorInfo::new("mts_core.canonical_encode", err.to_string()))
    })
}

/// Computes a stable hexadecimal SHA-256 hash of the canonical JSON encoding.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, MtsError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(hex::encode(Sha256::digest(bytes)))
}
