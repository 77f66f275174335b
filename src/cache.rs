//! Bounded FIFO caches keyed by content hash.

use indexmap::IndexMap;
use md5::{Digest, Md5};

/// Compute the MD5 hex digest of the given parts, in order.
pub fn content_hash<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// An insertion-ordered map that holds at most `capacity` entries.
///
/// Inserting into a full cache evicts the oldest entry. Lookups do not
/// refresh an entry's position.
#[derive(Debug, Clone)]
pub struct BoundedCache<V> {
    entries: IndexMap<String, V>,
    capacity: usize,
}

impl<V: Clone> BoundedCache<V> {
    /// Create an empty cache. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Get a copy of the cached value.
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    /// Check if a key is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, returning the key of the evicted entry if any.
    ///
    /// Re-inserting an existing key replaces its value in place.
    pub fn insert(&mut self, key: String, value: V) -> Option<String> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0).map(|(k, _)| k)
        } else {
            None
        };

        self.entries.insert(key, value);
        evicted
    }

    /// Change the capacity, evicting the oldest entries that no longer fit.
    pub fn resize(&mut self, capacity: usize) -> usize {
        self.capacity = capacity.max(1);
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
            evicted += 1;
        }
        evicted
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
