//! 对象缓存
//!
//! 以字符串形式缓存序列化对象（JWT 用户信息、有效权限集合等）。

pub mod moka;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use self::moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化缓存对象，反序列化失败时清除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Failed to deserialize cached value for {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 序列化并写入缓存
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 用户有效权限的缓存键
pub fn permissions_key(user_id: i64) -> String {
    format!("perms:{user_id}")
}

/// JWT 对应用户信息的缓存键
pub fn user_token_key(token: &str) -> String {
    format!("user:{token}")
}
