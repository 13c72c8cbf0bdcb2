//! Bounded least-recently-used memo table.
//!
//! # Invariants
//! - Never holds more than `capacity` entries.
//! - Capacity 0 disables storage entirely.
//! - Safe to share across threads; every access takes one short lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

struct Entry<V> {
    value: V,
    stamp: u64,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    recency: BTreeMap<u64, String>,
    next_stamp: u64,
}

/// String-keyed LRU cache.
pub struct LruCache<V> {
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                next_stamp: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().map_or(0, |inner| inner.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a clone of the cached value and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.lock()?;
        if !inner.entries.contains_key(key) {
            return None;
        }
        let stamp = inner.bump();
        let entry = inner.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut entry.stamp, stamp);
        let value = entry.value.clone();
        inner.recency.remove(&previous);
        inner.recency.insert(stamp, key.to_string());
        Some(value)
    }

    /// Inserts or refreshes `key`, evicting the least recently used entry
    /// when full.
    pub fn insert(&self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }
        let Some(mut inner) = self.lock() else {
            return;
        };

        let stamp = inner.bump();
        if let Some(old) = inner.entries.insert(key.clone(), Entry { value, stamp }) {
            inner.recency.remove(&old.stamp);
        }
        inner.recency.insert(stamp, key);

        while inner.entries.len() > self.capacity {
            let Some((_, oldest)) = inner.recency.pop_first() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }

    // Poisoned lock reads as a miss.
    fn lock(&self) -> Option<std::sync::MutexGuard<'_, Inner<V>>> {
        self.inner.lock().ok()
    }
}

impl<V> Inner<V> {
    fn bump(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }
}

#[cfg(test)]
mod tests {
    use super::LruCache;

    #[test]
    fn evicts_least_recently_used() {
        let cache = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(1));

        cache.insert("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn reinsert_refreshes_value_without_growing() {
        let cache = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("a".to_string(), 5);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(5));
    }

    #[test]
    fn misses_do_not_advance_recency() {
        let cache = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.inner.lock().unwrap().next_stamp, 1);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.inner.lock().unwrap().next_stamp, 2);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = LruCache::new(0);
        cache.insert("a".to_string(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
