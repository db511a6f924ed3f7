//! Memoized aspect ratios for file-backed items.
//!
//! Keys are an xxhash of (path + mtime + size), so a rewritten file gets a
//! fresh lookup while unchanged files resolve from memory on every rebuild.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

/// Default capacity for the LRU cache (number of entries).
const DEFAULT_CAPACITY: usize = 4096;

/// Cache key for ratio lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn new(path: &Path, mtime: i64, size: i64) -> Self {
        let mut input = Vec::with_capacity(path.as_os_str().len() + 16);
        input.extend_from_slice(path.as_os_str().as_encoded_bytes());
        input.extend_from_slice(&mtime.to_le_bytes());
        input.extend_from_slice(&size.to_le_bytes());
        Self(xxh3_64(&input))
    }
}

/// Shared, bounded ratio cache. Clones share storage.
#[derive(Clone)]
pub struct RatioCache {
    entries: Arc<Mutex<LruCache<CacheKey, f64>>>,
}

impl RatioCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<f64> {
        self.entries.lock().get(key).copied()
    }

    pub fn insert(&self, key: CacheKey, ratio: f64) {
        self.entries.lock().put(key, ratio);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for RatioCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_key_changes_on_mtime() {
        let path = PathBuf::from("a.jpg");
        assert_eq!(CacheKey::new(&path, 1, 10), CacheKey::new(&path, 1, 10));
        assert_ne!(CacheKey::new(&path, 1, 10), CacheKey::new(&path, 2, 10));
        assert_ne!(CacheKey::new(&path, 1, 10), CacheKey::new(&path, 1, 11));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = RatioCache::default();
        let key = CacheKey::new(Path::new("b.png"), 0, 0);
        assert!(cache.get(&key).is_none());
        cache.insert(key, 1.25);
        assert_eq!(cache.get(&key), Some(1.25));

        let shared = cache.clone();
        assert_eq!(shared.len(), 1);
        shared.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction() {
        let cache = RatioCache::new(2);
        for i in 0..5 {
            cache.insert(CacheKey::new(Path::new("c.png"), i, 0), 1.0);
        }
        assert_eq!(cache.len(), 2);
    }
}
