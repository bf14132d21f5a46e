//! In-memory TTL cache with LRU eviction
//!
//! Entries are stamped with the session version that was current when they
//! were written. A lookup under a different version behaves exactly like a
//! miss, which is how a session switch retires an old epoch without
//! sweeping the map on the switch path.
//!
//! Recency is tracked by position in an `IndexMap`: a hit moves the entry
//! to the back, and eviction pops from the front. Both are cheap at the
//! scale this cache targets (hundreds of resources across a few kinds).

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::cache::key::ResourceKey;

/// Default capacity: bounds memory for accounts with hundreds of resources
/// across several kinds, with headroom for detail entries.
pub const DEFAULT_CAPACITY: usize = 512;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
    session_version: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }

    fn is_valid(&self, current_version: u64) -> bool {
        !self.is_expired() && self.session_version == current_version
    }
}

struct Inner<V> {
    entries: IndexMap<ResourceKey, CacheEntry<V>>,
    capacity: usize,
}

/// Bounded TTL key/value store for fetched resource payloads.
///
/// The store never performs I/O and never blocks on the network; every
/// operation is a short critical section over the entry map. Values are
/// replaced whole on write, so a reader always observes a complete entry.
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: IndexMap::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Look up a value, treating expired and stale-session entries as
    /// misses. A hit refreshes the entry's LRU recency; a miss on an entry
    /// that is present but invalid removes it.
    pub fn get(&self, key: &ResourceKey, current_version: u64) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        let index = inner.entries.get_index_of(key)?;
        let entry = &inner.entries[index];
        if !entry.is_valid(current_version) {
            log::debug!("cache drop (invalid): {}", key);
            inner.entries.shift_remove_index(index);
            return None;
        }

        let value = entry.value.clone();
        let back = inner.entries.len() - 1;
        inner.entries.move_index(index, back);
        log::debug!("cache hit: {}", key);
        Some(value)
    }

    /// Insert or replace an entry, stamping the current time and the given
    /// session version. Evicts from the least-recently-used end if the
    /// store is over capacity afterwards.
    pub fn put(&self, key: ResourceKey, value: V, ttl: Duration, session_version: u64) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        // Re-inserting at the back keeps recency order correct on overwrite.
        inner.entries.shift_remove(&key);
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
                session_version,
            },
        );

        while inner.entries.len() > inner.capacity {
            if let Some((evicted, _)) = inner.entries.shift_remove_index(0) {
                log::debug!("cache evict (lru): {}", evicted);
            }
        }
    }

    /// Remove a single entry. Returns whether one was present.
    pub fn invalidate(&self, key: &ResourceKey) -> bool {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.shift_remove(key).is_some()
    }

    /// Eagerly remove every entry not stamped with `version`. Lazy
    /// rejection in `get` already guarantees isolation; this sweep just
    /// releases the memory early.
    pub fn retire_except(&self, version: u64) -> usize {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.session_version == version);
        before - inner.entries.len()
    }

    /// Remove everything. Returns the number of entries dropped.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let count = inner.entries.len();
        inner.entries.clear();
        count
    }

    /// Snapshot of entry counts for the `cache stats` surface.
    pub fn stats(&self, current_version: u64) -> CacheStats {
        let inner = self.inner.lock().expect("cache lock poisoned");
        let total = inner.entries.len();
        let fresh = inner
            .entries
            .values()
            .filter(|e| e.is_valid(current_version))
            .count();
        CacheStats {
            total_entries: total,
            fresh_entries: fresh,
            stale_entries: total - fresh,
            capacity: inner.capacity,
        }
    }
}

/// Point-in-time cache occupancy counts
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::ResourceKind;

    fn key(name: &str) -> ResourceKey {
        ResourceKey::detail(ResourceKind::Functions, "acct", "us-east-1", name)
    }

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_put_then_get() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, TTL, 0);

        assert_eq!(store.get(&key("a"), 0), Some(1));
    }

    #[test]
    fn test_get_absent_is_miss() {
        let store: CacheStore<u32> = CacheStore::new(16);
        assert_eq!(store.get(&key("missing"), 0), None);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, Duration::from_secs(0), 0);

        assert_eq!(store.get(&key("a"), 0), None);
    }

    #[test]
    fn test_ttl_boundary() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, Duration::from_millis(50), 0);

        // Well inside the window
        assert_eq!(store.get(&key("a"), 0), Some(1));

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(store.get(&key("a"), 0), None);
    }

    #[test]
    fn test_stale_session_version_is_miss() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, TTL, 1);

        // Unexpired, but written under an older epoch
        assert_eq!(store.get(&key("a"), 2), None);
        // The invalid entry is dropped, not resurrected for the old epoch
        assert_eq!(store.get(&key("a"), 1), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, TTL, 0);
        store.put(key("a"), 2u32, TTL, 0);

        assert_eq!(store.get(&key("a"), 0), Some(2));
    }

    #[test]
    fn test_lru_eviction_order() {
        let store = CacheStore::new(2);
        store.put(key("a"), 1u32, TTL, 0);
        store.put(key("b"), 2u32, TTL, 0);
        store.put(key("c"), 3u32, TTL, 0);

        // A was least recently used
        assert_eq!(store.get(&key("a"), 0), None);
        assert_eq!(store.get(&key("b"), 0), Some(2));
        assert_eq!(store.get(&key("c"), 0), Some(3));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let store = CacheStore::new(2);
        store.put(key("a"), 1u32, TTL, 0);
        store.put(key("b"), 2u32, TTL, 0);

        // Touch A so B becomes the eviction candidate
        assert_eq!(store.get(&key("a"), 0), Some(1));
        store.put(key("c"), 3u32, TTL, 0);

        assert_eq!(store.get(&key("a"), 0), Some(1));
        assert_eq!(store.get(&key("b"), 0), None);
        assert_eq!(store.get(&key("c"), 0), Some(3));
    }

    #[test]
    fn test_invalidate() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, TTL, 0);

        assert!(store.invalidate(&key("a")));
        assert!(!store.invalidate(&key("a")));
        assert_eq!(store.get(&key("a"), 0), None);
    }

    #[test]
    fn test_retire_except_sweeps_old_epochs() {
        let store = CacheStore::new(16);
        store.put(key("old"), 1u32, TTL, 1);
        store.put(key("new"), 2u32, TTL, 2);

        assert_eq!(store.retire_except(2), 1);
        assert_eq!(store.get(&key("new"), 2), Some(2));
        assert_eq!(store.stats(2).total_entries, 1);
    }

    #[test]
    fn test_stats_counts_fresh_and_stale() {
        let store = CacheStore::new(16);
        store.put(key("fresh"), 1u32, TTL, 0);
        store.put(key("expired"), 2u32, Duration::from_secs(0), 0);
        store.put(key("old-epoch"), 3u32, TTL, 9);

        let stats = store.stats(0);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.fresh_entries, 1);
        assert_eq!(stats.stale_entries, 2);
    }

    #[test]
    fn test_clear() {
        let store = CacheStore::new(16);
        store.put(key("a"), 1u32, TTL, 0);
        store.put(key("b"), 2u32, TTL, 0);

        assert_eq!(store.clear(), 2);
        assert_eq!(store.stats(0).total_entries, 0);
    }
}
