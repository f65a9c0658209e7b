use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Storage for memoized upstream responses.
///
/// Implementations decide freshness; callers only see hits and misses.
pub trait Cache<K, V>: Send + Sync {
    /// Get a fresh value, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Store a value.
    fn insert(&self, key: K, value: V);

    /// Drop every entry.
    fn clear(&self);
}

/// A thread-safe cache with TTL support.
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a new cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
        }
    }

    /// Get a value from the cache, evicting it if expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Set a value in the cache with the default TTL.
    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Set a value in the cache with a custom TTL.
    ///
    /// Expired entries are swept before inserting.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.cleanup();
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Remove all expired entries from the cache.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Get the number of entries in the cache (including expired).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        TtlCache::get(self, key)
    }

    fn insert(&self, key: K, value: V) {
        self.set(key, value);
    }

    fn clear(&self) {
        TtlCache::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basic() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"key2".to_string()), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.set(1u32, "value1".to_string());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_custom_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("short", 1, Duration::from_millis(10));
        cache.set_with_ttl("long", 2, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get(&"short"), None);
        assert_eq!(cache.get(&"long"), Some(2));
    }

    #[test]
    fn test_insert_sweeps_expired_keys() {
        let cache = TtlCache::new(Duration::from_millis(10));
        for days in 1..=50u32 {
            cache.set(days, days);
        }
        assert_eq!(cache.len(), 50);

        std::thread::sleep(Duration::from_millis(20));
        cache.set(51, 51);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&51), Some(51));
    }

    #[test]
    fn test_cache_cleanup() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.set("key1", 1);
        cache.set_with_ttl("key2", 2, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));
        cache.cleanup();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"key2"), Some(2));
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("key", 1);
        cache.set("key", 2);

        assert_eq!(cache.get(&"key"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_trait_object_clear() {
        let cache: Box<dyn Cache<String, i32>> =
            Box::new(TtlCache::new(Duration::from_secs(60)));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        cache.clear();
        assert_eq!(cache.get(&"a".to_string()), None);
    }
}
