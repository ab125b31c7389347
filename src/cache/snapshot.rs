//! Snapshot Module
//!
//! Flat, serializable records used to export a cache and hydrate another one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{CacheEntry, CacheKey};
use crate::error::{ClientError, Result};

// == Serialized Entry ==
/// One exported cache entry.
///
/// Serialized as `{"key": 123, "value": {...}, "expiresAt": 1700000000000}`;
/// `expiresAt` is `null` for entries that never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedEntry {
    pub key: CacheKey,
    pub value: Value,
    pub expires_at: Option<u64>,
}

impl SerializedEntry {
    pub fn from_entry(key: CacheKey, entry: &CacheEntry) -> Self {
        Self {
            key,
            value: entry.value.clone(),
            expires_at: entry.expires_at,
        }
    }

    pub fn into_entry(self) -> (CacheKey, CacheEntry) {
        (self.key, CacheEntry::restored(self.value, self.expires_at))
    }
}

/// Renders a snapshot as a JSON array.
pub fn snapshot_to_string(records: &[SerializedEntry]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| ClientError::Snapshot(e.to_string()))
}

/// Parses a snapshot previously produced by `snapshot_to_string`.
pub fn snapshot_from_str(raw: &str) -> Result<Vec<SerializedEntry>> {
    serde_json::from_str(raw).map_err(|e| ClientError::Snapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_shape() {
        let record = SerializedEntry {
            key: 42,
            value: json!({"hero": {"name": "Luke"}}),
            expires_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"key": 42, "value": {"hero": {"name": "Luke"}}, "expiresAt": null})
        );
    }

    #[test]
    fn test_parse_snapshot() {
        let raw = r#"[{"key": 1, "value": [1, 2], "expiresAt": 99}]"#;
        let records = snapshot_from_str(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expires_at, Some(99));

        let (key, entry) = records[0].clone().into_entry();
        assert_eq!(key, 1);
        assert_eq!(entry.value, json!([1, 2]));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_parse_invalid_snapshot() {
        let result = snapshot_from_str(r#"{"key": 1}"#);
        assert!(matches!(result, Err(ClientError::Snapshot(_))));
    }

    #[test]
    fn test_snapshot_to_string_is_array() {
        let raw = snapshot_to_string(&[]).unwrap();
        assert_eq!(raw, "[]");
    }
}
