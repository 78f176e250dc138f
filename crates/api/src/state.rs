//! Shared application state.

use std::sync::Arc;

use crate::cache::KeyValueStore;
use crate::config::ApiConfig;
use crate::db::{ProductStore, UserStore};
use crate::services::auth::{SessionCache, TokenIssuer};

/// Shared state handed to every handler.
///
/// Stores are held behind trait objects so tests can swap in the in-memory
/// implementations. Cloning is an `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ApiConfig,
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
    cache: Arc<dyn KeyValueStore>,
    sessions: SessionCache,
    tokens: TokenIssuer,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        cache: Arc<dyn KeyValueStore>,
    ) -> Self {
        let tokens = TokenIssuer::new(&config.access_token_secret, &config.refresh_token_secret);
        let sessions = SessionCache::new(Arc::clone(&cache));
        Self {
            inner: Arc::new(Inner {
                config,
                users,
                products,
                cache,
                sessions,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &dyn KeyValueStore {
        self.inner.cache.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionCache {
        &self.inner.sessions
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Whether session cookies should carry the Secure flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.inner.config.environment.is_production()
    }
}
