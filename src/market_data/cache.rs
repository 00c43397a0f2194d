//! Time-bounded, size-bounded memo table.
//!
//! Entries are never purged in the background: a stale entry is simply
//! superseded on the next miss for its key. When an insert pushes the table
//! over `max_entries`, the entry that expires first is dropped, oldest insert
//! first on ties. With a fixed TTL that is simply the oldest insert.
//!
//! The freshness check and the write are separate critical sections, so two
//! concurrent misses on one key both fetch and the later write wins.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

// Cap for TTLs that would overflow the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
    // insertion order, breaks expiry ties
    pub seq: u64,
}

// A value plus whether it was served from the table
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<V> {
    pub value: V,
    pub cached: bool,
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    max_entries: usize,
    next_seq: AtomicU64,
    entries: Mutex<AHashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self { ttl, max_entries, next_seq: AtomicU64::new(0), entries: Mutex::new(AHashMap::new()) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live value for `key`, if any. Stale entries are left in place.
    pub fn lookup(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    pub fn expires_at(&self, key: &K) -> Option<Instant> {
        self.entries.lock().get(key).map(|entry| entry.expires_at)
    }

    pub fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let expires_at = now.checked_add(self.ttl).unwrap_or_else(|| {
            warn!(ttl = ?self.ttl, "TTL overflows the clock, capping");
            now + FAR_FUTURE
        });
        let mut entries = self.entries.lock();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, CacheEntry { value, expires_at, seq });

        if entries.len() > self.max_entries {
            let earliest = entries
                .iter()
                .min_by_key(|(_, entry)| (entry.expires_at, entry.seq))
                .map(|(k, _)| k.clone());
            if let Some(k) = earliest {
                debug!(key = ?k, size = entries.len(), max = self.max_entries, "Evicting earliest-expiring entry");
                entries.remove(&k);
            }
        }
    }

    /// Serve `key` from the table, or run `fetch` and remember its result.
    pub async fn get_with<F, Fut>(&self, key: &K, fetch: F) -> Cached<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.lookup(key) {
            trace!(?key, "Cache hit");
            return Cached { value, cached: true };
        }

        trace!(?key, "Cache miss");
        let value = fetch().await;
        self.insert(key.clone(), value.clone());
        Cached { value, cached: false }
    }
}
