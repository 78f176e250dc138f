//! Key-value cache layer.
//!
//! Backs two concerns: the per-user refresh-token session records and the
//! featured-products response cache. Production uses Redis; tests use the
//! in-memory implementation.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryCache;
pub use redis::RedisCache;

/// Errors from the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend failed.
    #[error("Cache error: {0}")]
    Backend(String),
}

/// A string key-value store with optional expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Set a value with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Set a value that expires after `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Get a value, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn del(&self, key: &str) -> Result<(), CacheError>;
}
