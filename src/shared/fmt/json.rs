//! Bigint-safe JSON serialization for equality checks.
//!
//! Domain types serialize their `U256` fields as base-10 strings (see
//! [`crate::shared::serde_util::u256_dec`]), so the JSON form of two values is
//! equal exactly when the values are.

use serde::Serialize;

/// Serialize any value to a JSON string, with big integers rendered as strings.
pub fn safe_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Compare two values by their JSON form. Values that fail to serialize are
/// never equal.
pub fn values_equal<T: Serialize + ?Sized>(a: &T, b: &T) -> bool {
    match (safe_json_string(a), safe_json_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("values_equal: serialization failed: {}", e);
            false
        }
    }
}
