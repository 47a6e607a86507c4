use std::collections::BTreeMap;

use bytes::Bytes;

/// The single named store opened at activation.
pub const OFFLINE_CACHE_NAME: &str = "hearth-offline-v1";

/// A named cache store.
///
/// Opening the store satisfies installability heuristics; nothing in this
/// crate can put an entry into it, so every lookup misses for the worker's
/// whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    name: String,
    entries: BTreeMap<String, Bytes>,
}

impl CacheStore {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup(&self, url: &str) -> Option<&Bytes> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheRegistry {
    stores: BTreeMap<String, CacheStore>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a named store, creating it empty if it does not exist yet.
    pub fn open(&mut self, name: &str) -> &CacheStore {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| CacheStore::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&CacheStore> {
        self.stores.get(name)
    }

    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Total entries across every store.
    pub fn total_entries(&self) -> usize {
        self.stores.values().map(CacheStore::len).sum()
    }
}
