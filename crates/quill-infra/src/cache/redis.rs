//! Redis page cache with connection management and a key registry for `clear`.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use quill_core::ports::{Cache, CacheError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix for every key written by this cache.
    pub namespace: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            namespace: "quill:page".to_string(),
        }
    }
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Redis-backed cache shared by every server process.
///
/// Keys written through `set` are recorded in a registry set so that `clear`
/// only drops this cache's entries, never the whole database.
pub struct RedisCache {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisCache {
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, namespace = %config.namespace, "Connected to Redis cache");

        Ok(Self { conn, config })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.config.namespace, key)
    }

    fn registry_key(&self) -> String {
        format!("{}:__keys", self.config.namespace)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let full_key = self.key(key);

        match ttl {
            Some(duration) => {
                conn.set_ex::<_, _, ()>(&full_key, value, duration.as_secs().max(1))
                    .await
                    .map_err(|e| CacheError::Operation(e.to_string()))?;
            }
            None => {
                conn.set::<_, _, ()>(&full_key, value)
                    .await
                    .map_err(|e| CacheError::Operation(e.to_string()))?;
            }
        }

        conn.sadd::<_, _, ()>(self.registry_key(), &full_key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let registry = self.registry_key();

        let mut keys: Vec<String> = conn
            .smembers(&registry)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        let dropped = keys.len();
        keys.push(registry);

        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        tracing::debug!(dropped, "Redis cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_cache(namespace: &str) -> Option<RedisCache> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            namespace: namespace.to_string(),
        };

        RedisCache::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_cache_set_get_clear() {
        let cache = match get_test_cache("quill-test:set-get").await {
            Some(c) => c,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        cache.set("index:anon:1", "<html>", None).await.unwrap();
        assert_eq!(cache.get("index:anon:1").await, Some("<html>".to_string()));

        cache.clear().await.unwrap();
        assert_eq!(cache.get("index:anon:1").await, None);
    }

    #[tokio::test]
    async fn test_redis_cache_ttl() {
        let cache = match get_test_cache("quill-test:ttl").await {
            Some(c) => c,
            None => return,
        };

        cache
            .set("page", "cached", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(cache.get("page").await, Some("cached".to_string()));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get("page").await, None);

        cache.clear().await.unwrap();
    }
}
