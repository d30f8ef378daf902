//! Keyed value storage with access statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::model::Value;

/// Counters reported by [`ValueStore::statistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    pub reads: u64,
    pub writes: u64,
    pub serializations: u64,
}

/// A map from string keys to values.
///
/// Reads are counted through `&self`, so lookups on a store behind
/// [`crate::sync::Shared::read`] still update the statistics.
#[derive(Debug, Default)]
pub struct ValueStore {
    entries: FxHashMap<String, Value>,
    reads: AtomicU64,
    writes: AtomicU64,
    serializations: AtomicU64,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn add(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key.into(), value)
    }

    /// Looks up `key`. Only a hit counts as a read.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let found = self.entries.get(key);
        if found.is_some() {
            self.reads.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`. Removal is not counted as a write.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending byte order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by key.
    pub fn sorted_entries(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            serializations: self.serializations.load(Ordering::Relaxed),
        }
    }

    pub fn reset_statistics(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.serializations.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record_serialization(&self) {
        self.serializations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn from_entries(entries: FxHashMap<String, Value>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

impl Clone for ValueStore {
    fn clone(&self) -> Self {
        let stats = self.statistics();
        Self {
            entries: self.entries.clone(),
            reads: AtomicU64::new(stats.reads),
            writes: AtomicU64::new(stats.writes),
            serializations: AtomicU64::new(stats.serializations),
        }
    }
}

// Statistics are bookkeeping, not content.
impl PartialEq for ValueStore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
