//! Fixed-size chained hash table mapping task keys to values.
//!
//! The bucket count is set at construction and never changes. Lookups stay
//! O(1) on average only while the number of keys is a small multiple of
//! the bucket count; beyond that chains grow linearly.

/// Default number of buckets.
pub const DEFAULT_BUCKETS: usize = 100;

/// Key index with separate chaining.
#[derive(Debug, Clone)]
pub struct KeyIndex<V> {
    buckets: Vec<Vec<(String, V)>>,
    len: usize,
}

impl<V> KeyIndex<V> {
    /// Create an index with the default bucket count.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create an index with `buckets` chains (at least one).
    pub fn with_buckets(buckets: usize) -> Self {
        let buckets = buckets.max(1);
        Self {
            buckets: (0..buckets).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert or overwrite the value for `key`.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let bucket = self.bucket_for(&key);
        let chain = &mut self.buckets[bucket];

        if let Some(entry) = chain.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
            return;
        }
        chain.push((key, value));
        self.len += 1;
    }

    /// Look up the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_for(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove the entry for `key`; absent keys are ignored.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let bucket = self.bucket_for(key);
        let chain = &mut self.buckets[bucket];
        let pos = chain.iter().position(|(k, _)| k == key)?;
        self.len -= 1;
        Some(chain.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove every entry, keeping the bucket table.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Length of the longest chain.
    #[cfg(test)]
    fn max_chain_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn bucket_for(&self, key: &str) -> usize {
        string_hash(key).unsigned_abs() as usize % self.buckets.len()
    }
}

impl<V> Default for KeyIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Polynomial string hash: `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 units,
/// wrapping at 32 bits.
fn string_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
