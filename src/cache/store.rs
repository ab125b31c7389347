//! Cache Store Module
//!
//! Response cache engine combining a pluggable backing map with lazy TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheKey, CacheMap, CacheStats, SerializedEntry,
};

// == Cache Store ==
/// TTL-aware mapping from cache key to stored response data.
///
/// Expired entries are logically absent. They are physically removed when a
/// lookup observes them or when `purge_expired` runs.
#[derive(Debug)]
pub struct CacheStore {
    /// Backing key-value storage
    entries: Box<dyn CacheMap>,
    /// Lookup statistics
    stats: CacheStats,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store backed by a `HashMap`.
    pub fn new() -> Self {
        Self::with_map(HashMap::new())
    }

    /// Creates a store on top of a caller-supplied map.
    ///
    /// Whatever the map already holds becomes part of the cache.
    pub fn with_map(map: impl CacheMap + 'static) -> Self {
        let mut stats = CacheStats::new();
        stats.set_total_entries(map.len());
        Self {
            entries: Box::new(map),
            stats,
        }
    }

    // == Hydration ==
    /// Rebuilds a store from exported records.
    ///
    /// Records are loaded even if already expired; they are dropped on the
    /// next lookup like any other stale entry.
    pub fn from_serializable(records: Vec<SerializedEntry>) -> Self {
        let mut store = Self::new();
        store.hydrate(records);
        store
    }

    /// Loads exported records into this store, overwriting matching keys.
    pub fn hydrate(&mut self, records: Vec<SerializedEntry>) {
        let count = records.len();
        for record in records {
            let (key, entry) = record.into_entry();
            self.entries.insert(key, entry);
        }
        self.stats.set_total_entries(self.entries.len());
        debug!("Hydrated cache with {} records", count);
    }

    // == Export ==
    /// Snapshots every stored entry, sorted by key.
    ///
    /// Entries that expired but were not yet looked up are included.
    pub fn to_serializable(&self) -> Vec<SerializedEntry> {
        let mut records: Vec<SerializedEntry> = self
            .entries
            .entries()
            .map(|(key, entry)| SerializedEntry::from_entry(key, entry))
            .collect();
        records.sort_by_key(|record| record.key);
        records
    }

    // == Set ==
    /// Stores response data under `key`, replacing any previous entry.
    ///
    /// # Arguments
    /// * `key` - Derived cache key
    /// * `value` - The `data` payload of an error-free response
    /// * `ttl` - Lifetime of the entry; `None` never expires
    pub fn set(&mut self, key: CacheKey, value: Value, ttl: Option<Duration>) {
        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the data stored under `key` if present and not expired.
    ///
    /// An expired entry is removed and counted as a miss.
    pub fn get(&mut self, key: CacheKey) -> Option<Value> {
        let expired = match self.entries.lookup(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            debug!("Cache entry {} expired", key);
        }
        self.stats.record_miss();
        None
    }

    // == Clear ==
    /// Removes every entry unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<CacheKey> = self
            .entries
            .entries()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key)
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(key);
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
