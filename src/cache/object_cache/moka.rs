use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::{AppConfig, CacheConfig};
use crate::declare_object_cache_plugin;
use crate::errors::Result;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct CachedEntry {
    value: String,
    ttl: Duration,
}

// 每个条目按写入时指定的 TTL 过期
struct EntryExpiry;

impl Expiry<String, CachedEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, CachedEntry>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(&AppConfig::get().cache))
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default ttl: {}s",
            config.memory.max_capacity, config.default_ttl
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(config.default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(entry.value)
            }
            None => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, CachedEntry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MokaCacheWrapper {
        MokaCacheWrapper::with_config(&CacheConfig::default())
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = cache();
        cache
            .insert_raw("assignment:1".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("assignment:1").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("assignment:1").await;
        assert_eq!(cache.get_raw("assignment:1").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = cache();
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }
}
