//! Time-limited cache entries on top of a [`KeyValueStore`]

use super::KeyValueStore;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Storage key for the public ticket statistics
pub const PUBLIC_STATS_KEY: &str = "public_stats_cache";

/// How long public statistics stay fresh, in minutes
pub const PUBLIC_STATS_TTL_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    fetched_at: DateTime<Utc>,
    value: T,
}

/// A single cached value with a time-to-live
pub struct TtlCache<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    key: &'a str,
    ttl: Duration,
}

impl<'a, S: KeyValueStore + ?Sized> TtlCache<'a, S> {
    pub const fn new(store: &'a S, key: &'a str, ttl: Duration) -> Self {
        Self { store, key, ttl }
    }

    /// Returns the cached value if it is younger than the TTL at `now`
    pub fn get_fresh<T: DeserializeOwned>(&self, now: DateTime<Utc>) -> Result<Option<T>> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };
        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Ignoring unreadable cache entry '{}': {}", self.key, e);
                return Ok(None);
            },
        };
        if now - entry.fetched_at >= self.ttl {
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    /// Stores `value` as fetched at `now`
    pub fn put<T: Serialize>(&self, value: &T, now: DateTime<Utc>) -> Result<()> {
        let raw = serde_json::to_string(&CacheEntry {
            fetched_at: now,
            value,
        })?;
        self.store.set(self.key, &raw)
    }

    pub fn invalidate(&self) -> Result<()> {
        self.store.remove(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_entry_expires_after_ttl() {
        let store = MemoryStore::new();
        let cache = TtlCache::new(
            &store,
            PUBLIC_STATS_KEY,
            Duration::minutes(PUBLIC_STATS_TTL_MINUTES),
        );
        let now = Utc::now();

        cache.put(&vec![1u32, 2, 3], now).unwrap();

        let fresh: Option<Vec<u32>> = cache.get_fresh(now + Duration::minutes(14)).unwrap();
        assert_eq!(fresh, Some(vec![1, 2, 3]));

        let stale: Option<Vec<u32>> = cache.get_fresh(now + Duration::minutes(15)).unwrap();
        assert!(stale.is_none());
    }

    #[test]
    fn test_invalidate() {
        let store = MemoryStore::new();
        let cache = TtlCache::new(&store, "k", Duration::seconds(10));
        let now = Utc::now();
        cache.put(&"x", now).unwrap();
        cache.invalidate().unwrap();
        assert!(cache.get_fresh::<String>(now).unwrap().is_none());
    }
}
