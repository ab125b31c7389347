//! Backing Map Module
//!
//! Abstracts the key-value container a `CacheStore` keeps its entries in.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use crate::cache::{CacheEntry, CacheKey};

// == Cache Map Trait ==
/// Storage a `CacheStore` can run on top of.
///
/// Only point lookup, insertion, removal and iteration are required; expiry
/// is handled by the store, never by the map.
pub trait CacheMap: Debug + Send + Sync {
    /// Returns the entry stored under `key`, expired or not.
    fn lookup(&self, key: CacheKey) -> Option<&CacheEntry>;

    /// Inserts or replaces the entry under `key`.
    fn insert(&mut self, key: CacheKey, entry: CacheEntry);

    /// Removes and returns the entry under `key`.
    fn remove(&mut self, key: CacheKey) -> Option<CacheEntry>;

    /// Removes every entry.
    fn clear(&mut self);

    /// Iterates over all stored entries.
    fn entries(&self) -> Box<dyn Iterator<Item = (CacheKey, &CacheEntry)> + '_>;

    /// Number of stored entries, including not-yet-removed expired ones.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheMap for HashMap<CacheKey, CacheEntry> {
    fn lookup(&self, key: CacheKey) -> Option<&CacheEntry> {
        self.get(&key)
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) {
        HashMap::insert(self, key, entry);
    }

    fn remove(&mut self, key: CacheKey) -> Option<CacheEntry> {
        HashMap::remove(self, &key)
    }

    fn clear(&mut self) {
        HashMap::clear(self);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (CacheKey, &CacheEntry)> + '_> {
        Box::new(self.iter().map(|(key, entry)| (*key, entry)))
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl CacheMap for BTreeMap<CacheKey, CacheEntry> {
    fn lookup(&self, key: CacheKey) -> Option<&CacheEntry> {
        self.get(&key)
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) {
        BTreeMap::insert(self, key, entry);
    }

    fn remove(&mut self, key: CacheKey) -> Option<CacheEntry> {
        BTreeMap::remove(self, &key)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (CacheKey, &CacheEntry)> + '_> {
        Box::new(self.iter().map(|(key, entry)| (*key, entry)))
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
