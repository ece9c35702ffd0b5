use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache.memory.max_capacity, config.cache.default_ttl)
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // Moka 使用构建时的全局 TTL，单条 TTL 仅记录
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL ({}s) for {}", ttl, key);
        }
        self.inner.insert(key, value).await;
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
    use crate::cache::{get_json, insert_json, permissions_key};

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = MokaCacheWrapper::new(100, 60);
        cache
            .insert_raw("k".to_string(), "v".to_string(), 0)
            .await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MokaCacheWrapper::new(100, 60);
        let codes = vec!["grades.record".to_string(), "grades.view".to_string()];
        insert_json(&cache, permissions_key(7), &codes, 0).await;

        let cached: Option<Vec<String>> = get_json(&cache, &permissions_key(7)).await;
        assert_eq!(cached, Some(codes));

        // 类型不匹配时清除缓存
        let wrong: Option<i64> = get_json(&cache, &permissions_key(7)).await;
        assert!(wrong.is_none());
        assert_eq!(cache.get_raw(&permissions_key(7)).await, CacheResult::NotFound);
    }
}
