//! Redis-backed key-value cache.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{CacheError, KeyValueStore};

/// Redis cache over a multiplexed connection manager.
///
/// The manager reconnects on its own, so a clone per operation is all the
/// connection handling the callers need.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(to_cache_error)?;
        let mut manager = ConnectionManager::new(client)
            .await
            .map_err(to_cache_error)?;

        redis::cmd("PING")
            .query_async::<()>(&mut manager)
            .await
            .map_err(to_cache_error)?;

        Ok(Self { manager })
    }
}

fn to_cache_error(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl KeyValueStore for RedisCache {
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(to_cache_error)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(to_cache_error)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(to_cache_error)
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await.map_err(to_cache_error)
    }
}
