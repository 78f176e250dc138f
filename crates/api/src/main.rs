//! Tamarind e-commerce backend.
//!
//! Serves the store API on port 5000 (configurable).
//!
//! # Architecture
//!
//! - Axum web framework, JSON API consumed by the web frontend
//! - MongoDB for users and the product catalog
//! - Redis for refresh-token session records and the featured-products cache
//! - Dual-token cookie auth: 15 minute access JWT, 7 day refresh JWT

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tamarind_api::cache::RedisCache;
use tamarind_api::config::ApiConfig;
use tamarind_api::db::{MongoProductStore, MongoUserStore};
use tamarind_api::routes;
use tamarind_api::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tamarind_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Connect to MongoDB
    let mongo = mongodb::Client::with_uri_str(config.mongo_uri.expose_secret())
        .await
        .expect("Failed to connect to MongoDB");
    let db = mongo.database(&config.mongo_db);
    tracing::info!(database = %config.mongo_db, "MongoDB connected");

    let users = MongoUserStore::new(&db);
    users
        .ensure_indexes()
        .await
        .expect("Failed to create user indexes");
    let products = MongoProductStore::new(&db);

    // Connect to Redis (session records and featured-products cache)
    let cache = RedisCache::connect(config.redis_url.expose_secret())
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Redis connected");

    // Build application state and router
    let addr = config.socket_addr();
    let state = AppState::new(config, Arc::new(users), Arc::new(products), Arc::new(cache));

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
