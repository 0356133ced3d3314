//! Bounded least-recently-used cache in front of the key index.

use crate::store::StoreError;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Fixed-capacity LRU cache keyed by task key.
///
/// Purely a read accelerant: it may be cleared at any time without
/// affecting correctness.
#[derive(Debug)]
pub struct BoundedCache<V> {
    entries: LruCache<String, V>,
}

impl<V> BoundedCache<V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| StoreError::InvalidConfig("cache capacity must be non-zero".to_string()))?;
        Ok(Self {
            entries: LruCache::new(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or update `key`, evicting the least recently used entry when full.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        if let Some((evicted, _)) = self.entries.push(key.into(), value)
            && !self.entries.contains(&evicted)
        {
            log::debug!("Cache evicted {}", evicted);
        }
    }

    /// Membership check that leaves recency untouched.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Drop a single entry.
    #[cfg(test)]
    fn invalidate(&mut self, key: &str) -> Option<V> {
        self.entries.pop(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The entry that would be evicted next.
    #[cfg(test)]
    fn least_recent(&self) -> Option<&str> {
        self.entries.peek_lru().map(|(k, _)| k.as_str())
    }
}
