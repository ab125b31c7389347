//! Cache Module
//!
//! Provides the in-memory GraphQL response cache: key derivation, TTL
//! expiration, pluggable backing maps and JSON export/import.

mod entry;
mod key;
mod map;
mod snapshot;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{canonical_variables, derive_cache_key, CacheKey};
pub use map::CacheMap;
pub use snapshot::{snapshot_from_str, snapshot_to_string, SerializedEntry};
pub use stats::CacheStats;
pub use store::CacheStore;

/// A cache store that can be handed to several clients at once.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store so it can be shared between clients.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
