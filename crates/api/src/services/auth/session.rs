//! Server-side refresh-token session records.
//!
//! One record per user, keyed `refresh_token:<user id hex>`. Issuing a new
//! pair overwrites the record, so at most one refresh token per user is
//! valid at a time and a later login invalidates every earlier session.

use std::sync::Arc;

use tamarind_core::UserId;

use crate::cache::{CacheError, KeyValueStore};

/// Key prefix for refresh-token records.
pub const REFRESH_TOKEN_KEY_PREFIX: &str = "refresh_token:";

/// Record TTL, matching the refresh token lifetime of 7 days.
const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Refresh-token records over a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionCache {
    store: Arc<dyn KeyValueStore>,
}

impl SessionCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(user_id: UserId) -> String {
        format!("{REFRESH_TOKEN_KEY_PREFIX}{}", user_id.to_hex())
    }

    /// Store the user's current refresh token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache write fails.
    pub async fn record(&self, user_id: UserId, refresh_token: &str) -> Result<(), CacheError> {
        self.store
            .set_ex(&Self::key(user_id), refresh_token, SESSION_TTL_SECS)
            .await
    }

    /// The refresh token currently on record for the user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache read fails.
    pub async fn lookup(&self, user_id: UserId) -> Result<Option<String>, CacheError> {
        self.store.get(&Self::key(user_id)).await
    }

    /// Drop the user's session record. A no-op if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache delete fails.
    pub async fn revoke(&self, user_id: UserId) -> Result<(), CacheError> {
        self.store.del(&Self::key(user_id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    #[tokio::test]
    async fn test_record_overwrites_previous() {
        let sessions = SessionCache::new(Arc::new(MemoryCache::new()));
        let user_id = UserId::new();

        sessions.record(user_id, "first").await.unwrap();
        sessions.record(user_id, "second").await.unwrap();

        assert_eq!(
            sessions.lookup(user_id).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_revoke_then_lookup_is_none() {
        let sessions = SessionCache::new(Arc::new(MemoryCache::new()));
        let user_id = UserId::new();

        sessions.record(user_id, "token").await.unwrap();
        sessions.revoke(user_id).await.unwrap();
        assert_eq!(sessions.lookup(user_id).await.unwrap(), None);

        // Revoking again is still fine.
        sessions.revoke(user_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_records_are_per_user() {
        let sessions = SessionCache::new(Arc::new(MemoryCache::new()));
        let alice = UserId::new();
        let bob = UserId::new();

        sessions.record(alice, "alice-token").await.unwrap();
        assert_eq!(sessions.lookup(bob).await.unwrap(), None);
    }
}
