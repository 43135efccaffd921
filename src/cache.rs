//! TTL-bounded in-memory cache for ranked suggestion lists.
//!
//! Expiry is lazy: an entry's age is checked on read and stale entries are
//! deleted at that moment. There is no background sweeper, so an entry that
//! is never read again simply sits until a `clear_by_prefix` or overwrite
//! removes it. The TTL is supplied per read rather than stored per entry,
//! which lets callers with different freshness needs share one cache.

use ahash::AHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

/// String-keyed cache with read-time expiry.
///
/// Each instance owns its own map; nothing here is global. The map sits
/// behind a `std::sync::Mutex` because `get` is a read that may also delete,
/// and that pair has to be atomic under concurrent readers. Lock poisoning
/// is absorbed, so a panic in one caller never poisons the cache for others.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<AHashMap<String, CacheEntry<V>>>,
}

// Hand-written: the derive would put a `V: Default` bound on an empty map.
impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(AHashMap::new()),
        }
    }
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, overwriting any previous entry and
    /// resetting its age to zero.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        trace!("Caching entry for {}", key);
        self.lock().insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Deletes every entry whose key starts with `prefix`. An empty prefix
    /// clears the whole cache.
    pub fn clear_by_prefix(&self, prefix: &str) {
        let mut entries = self.lock();
        let before = entries.len();
        if prefix.is_empty() {
            entries.clear();
        } else {
            entries.retain(|key, _| !key.starts_with(prefix));
        }
        debug!(
            "Cleared {} cache entries matching prefix {:?}",
            before - entries.len(),
            prefix
        );
    }

    /// Number of stored entries, counting any that have outlived a caller's
    /// TTL but have not been read since.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, AHashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> TtlCache<V> {
    /// Returns the value under `key` if it is younger than `ttl`.
    ///
    /// An entry older than `ttl` is deleted before returning `None`, so a
    /// later read with a longer TTL cannot resurrect it.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let mut entries = self.lock();
        let Some(entry) = entries.get(key) else {
            trace!("Cache miss for {}", key);
            return None;
        };
        if entry.created_at.elapsed() > ttl {
            debug!("Cache entry for {} expired, deleting", key);
            entries.remove(key);
            return None;
        }
        trace!("Cache hit for {}", key);
        Some(entry.value.clone())
    }
}
