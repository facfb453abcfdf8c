//! Process-local TTL cache.
//!
//! Entries expire a fixed window after they were stored. Expiry is lazy: a
//! stale entry is evicted by the read that finds it, there is no background
//! sweep. There is no size bound because the key space is one entry per
//! collection.
//!
//! The cache is an ordinary value owned by whoever constructs it (normally
//! [`crate::Catalog`]), so tests get isolated instances.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

/// Default time-to-live for cached collection lists (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Key/value cache with a fixed expiry window.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Evict `key` if it has outlived the TTL. Returns the live entry, if any.
    fn live_entry<'a>(
        &self,
        entries: &'a mut HashMap<String, CacheEntry<V>>,
        key: &str,
    ) -> Option<&'a mut CacheEntry<V>> {
        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl);
        if expired {
            entries.remove(key);
            tracing::debug!(key, "Cache entry expired");
            return None;
        }
        entries.get_mut(key)
    }

    /// The cached value if present and younger than the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        self.live_entry(&mut entries, key)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn set(&self, key: &str, value: V) {
        self.lock().insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Transform a live entry in place and restamp it.
    ///
    /// Returns `false` (and does nothing) when the key is absent or expired.
    /// The read-modify-write happens under one lock, so concurrent updates
    /// to the same key serialize instead of losing each other's changes.
    pub fn update<F>(&self, key: &str, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let mut entries = self.lock();
        match self.live_entry(&mut entries, key) {
            Some(entry) => {
                f(&mut entry.value);
                entry.stored_at = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Drop keys starting with `prefix`, or every key when `prefix` is `None`.
    pub fn invalidate(&self, prefix: Option<&str>) {
        let mut entries = self.lock();
        match prefix {
            Some(prefix) => entries.retain(|key, _| !key.starts_with(prefix)),
            None => entries.clear(),
        }
    }

    /// Number of stored entries, including ones not yet lazily evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
