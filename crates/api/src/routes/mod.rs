//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Auth
//! POST   /api/auth/signup             - Create account, start session (201)
//! POST   /api/auth/login              - Verify credentials, start session
//! POST   /api/auth/logout             - Revoke session, clear cookies
//! POST   /api/auth/refresh            - Re-mint the access token
//! GET    /api/auth/profile            - Current user (requires auth)
//!
//! # Products
//! GET    /api/products                - All products (admin)
//! POST   /api/products                - Create product (admin)
//! GET    /api/products/featured       - Featured products (cached)
//! GET    /api/products/category/{c}   - Products in a category
//! GET    /api/products/recommendations - Random sample of 4
//! PATCH  /api/products/{id}           - Toggle featured flag (admin)
//! DELETE /api/products/{id}           - Delete product (admin)
//!
//! # Cart (requires auth)
//! GET    /api/cart                    - Cart lines hydrated with products
//! POST   /api/cart                    - Add a product (or bump quantity)
//! DELETE /api/cart                    - Remove a product (or clear)
//! PUT    /api/cart/{id}               - Set a line's quantity
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh", post(auth::refresh))
        .route("/profile", get(auth::profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/featured", get(products::featured))
        .route("/category/{category}", get(products::by_category))
        .route("/recommendations", get(products::recommendations))
        .route(
            "/{id}",
            delete(products::destroy).patch(products::toggle_featured),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::index).post(cart::add).delete(cart::remove),
        )
        .route("/{id}", put(cart::update_quantity))
}

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .with_state(state)
}

/// Liveness check. Does not touch dependencies.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check. Verifies the database and cache respond.
async fn readiness(axum::extract::State(state): axum::extract::State<AppState>) -> StatusCode {
    let db_ok = state.products().find_by_ids(&[]).await.is_ok();
    let cache_ok = state.cache().get("readiness-probe").await.is_ok();
    if db_ok && cache_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
