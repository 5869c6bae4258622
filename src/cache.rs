//! Bounded, optionally expiring memo table keyed by request text.

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use log::trace;
use lru::LruCache;
use parking_lot::Mutex;

/// Capacity floor; smaller requests are raised to this.
pub const MIN_CAPACITY: usize = 50;

struct Entry<V> {
    value: V,
    created_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        !ttl.is_zero() && self.created_at.elapsed() > ttl
    }
}

/// Least-recently-used map with a time-to-live. A zero TTL disables expiry.
///
/// Every operation holds the lock for its whole duration, including the
/// builder passed to [`BoundedCache::get_or_compute`].
pub struct BoundedCache<V> {
    entries: Mutex<LruCache<String, Entry<V>>>,
    ttl: Duration,
}

impl<V: Clone> BoundedCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(MIN_CAPACITY)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns the live value for `key`, building and storing it on a miss.
    /// A builder returning `None` stores nothing.
    pub fn get_or_compute<F>(&self, key: &str, build: F) -> Option<V>
    where
        F: FnOnce(&str) -> Option<V>,
    {
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            trace!("cache entry expired: {key}");
            entries.pop(key);
        }

        let value = build(key)?;
        let entry = Entry {
            value: value.clone(),
            created_at: Instant::now(),
        };
        if let Some((evicted, _)) = entries.push(key.to_string(), entry) {
            if evicted != key {
                trace!("cache evicted: {evicted}");
            }
        }
        Some(value)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Membership test that does not refresh recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().peek(key).is_some()
    }
}
