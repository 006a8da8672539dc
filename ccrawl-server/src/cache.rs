//! Bounded in-memory cache with per-entry expiry
//!
//! Used for query → artist and artist → response lookups. When an insert
//! would exceed capacity, expired entries are dropped first, then the oldest
//! insertions.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    /// Insertion stamp, lower is older
    inserted: u64,
}

/// Capacity-bounded TTL cache
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
    next_stamp: u64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
            next_stamp: 0,
        }
    }

    /// Cached value, if present and not expired
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.prune(now);
        }

        let inserted = self.next_stamp;
        self.next_stamp += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
                inserted,
            },
        );
    }

    /// Make room for one more entry
    fn prune(&mut self, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);

        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_get_after_insert() {
        let mut cache = TtlCache::new(10, TTL);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let mut cache = TtlCache::new(10, TTL);
        let start = Instant::now();
        cache.insert_at("a", 1, start);

        assert_eq!(cache.get_at(&"a", start + Duration::from_secs(59)), Some(1));
        assert_eq!(cache.get_at(&"a", start + Duration::from_secs(61)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut cache = TtlCache::new(2, TTL);
        let now = Instant::now();
        cache.insert_at("a", 1, now);
        cache.insert_at("b", 2, now);
        cache.insert_at("c", 3, now);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&"a", now), None);
        assert_eq!(cache.get_at(&"b", now), Some(2));
        assert_eq!(cache.get_at(&"c", now), Some(3));
    }

    #[test]
    fn test_expired_entries_pruned_before_eviction() {
        let mut cache = TtlCache::new(2, TTL);
        let start = Instant::now();
        cache.insert_at("old", 1, start);
        let later = start + Duration::from_secs(30);
        cache.insert_at("fresh", 2, later);

        // "old" has expired by now, so "fresh" survives the insert
        let now = start + Duration::from_secs(61);
        cache.insert_at("new", 3, now);

        assert_eq!(cache.get_at(&"fresh", now), Some(2));
        assert_eq!(cache.get_at(&"new", now), Some(3));
        assert_eq!(cache.get_at(&"old", now), None);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let mut cache = TtlCache::new(2, TTL);
        let now = Instant::now();
        cache.insert_at("a", 1, now);
        cache.insert_at("b", 2, now);
        cache.insert_at("a", 10, now);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&"a", now), Some(10));
        assert_eq!(cache.get_at(&"b", now), Some(2));
    }
}
