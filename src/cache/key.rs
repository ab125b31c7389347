//! Cache Key Module
//!
//! Derives a compact 32-bit cache key from query text and variables.
//!
//! Keys are xxHash32 digests of the query text followed by a canonical JSON
//! rendering of the variables. Object keys are sorted recursively before
//! rendering, so `{"a":1,"b":2}` and `{"b":2,"a":1}` share a key. The query
//! text is hashed verbatim: whitespace differences produce different keys.
//!
//! A 32-bit key collides eventually. Colliding writes overwrite each other in
//! the store, which is fine for caches holding up to a few thousand entries.

use serde_json::{Map, Value};
use xxhash_rust::xxh32::xxh32;

/// Fixed-width fingerprint of a (query, variables) pair.
pub type CacheKey = u32;

/// Fixed seed so keys stay stable across processes and exported snapshots
const KEY_SEED: u32 = 0;

// == Derive ==
/// Computes the cache key for a query and its variables.
///
/// Absent variables and JSON `null` hash identically; an empty object does not.
pub fn derive_cache_key(query: &str, variables: Option<&Value>) -> CacheKey {
    let mut input = String::from(query);
    input.push_str(&canonical_variables(variables));
    xxh32(input.as_bytes(), KEY_SEED)
}

/// Renders variables as compact JSON with object keys sorted at every depth.
pub fn canonical_variables(variables: Option<&Value>) -> String {
    match variables {
        None | Some(Value::Null) => String::new(),
        Some(value) => sort_json_value(value).to_string(),
    }
}

fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
            let sorted_map: Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_json_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_json_value).collect()),
        _ => value.clone(),
    }
}
