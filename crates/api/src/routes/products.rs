//! Product catalog route handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tamarind_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::{CreateProductRequest, ProductResponse};
use crate::state::AppState;

/// Cache key for the featured-products response.
pub const FEATURED_CACHE_KEY: &str = "featured_products";

/// How many products the recommendations endpoint samples.
const RECOMMENDATION_COUNT: u32 = 4;

fn parse_id(id: &str) -> Result<ProductId> {
    ProductId::parse(id).map_err(|_| AppError::NotFound("Product not found".to_string()))
}

fn to_responses(products: &[crate::models::Product]) -> Vec<ProductResponse> {
    products.iter().map(ProductResponse::from).collect()
}

/// `GET /api/products` (admin)
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let products = state.products().find_all().await?;
    Ok(Json(json!({ "products": to_responses(&products) })))
}

/// `GET /api/products/featured`
///
/// Served from the cache when possible. Cache failures fall back to the
/// database rather than failing the request.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    match state.cache().get(FEATURED_CACHE_KEY).await {
        Ok(Some(cached)) => match serde_json::from_str::<Vec<ProductResponse>>(&cached) {
            Ok(products) => return Ok(Json(products)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable featured-products cache entry");
            }
        },
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Featured-products cache read failed, using database");
        }
    }

    let products = state.products().find_featured().await?;
    if products.is_empty() {
        return Err(AppError::NotFound(
            "No featured products found".to_string(),
        ));
    }

    let responses = to_responses(&products);
    write_featured_cache(&state, &responses).await;
    Ok(Json(responses))
}

/// `POST /api/products` (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    if let Err(errors) = body.validate() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::BadRequest(message));
    }

    let product = state.products().insert(&body).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// `DELETE /api/products/{id}` (admin)
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    if !state.products().delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// `GET /api/products/recommendations`
pub async fn recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products().sample(RECOMMENDATION_COUNT).await?;
    Ok(Json(to_responses(&products)))
}

/// `GET /api/products/category/{category}`
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>> {
    let products = state.products().find_by_category(&category).await?;
    Ok(Json(json!({ "products": to_responses(&products) })))
}

/// `PATCH /api/products/{id}` (admin)
///
/// Flips the featured flag and rebuilds the featured-products cache.
pub async fn toggle_featured(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;
    let product = state
        .products()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let updated = state
        .products()
        .set_featured(id, !product.is_featured)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    rebuild_featured_cache(&state).await;
    Ok(Json(ProductResponse::from(&updated)))
}

/// Re-query the featured set and overwrite the cache entry.
async fn rebuild_featured_cache(state: &AppState) {
    match state.products().find_featured().await {
        Ok(products) => write_featured_cache(state, &to_responses(&products)).await,
        Err(e) => {
            tracing::warn!(error = %e, "Featured-products cache rebuild query failed");
        }
    }
}

async fn write_featured_cache(state: &AppState, products: &[ProductResponse]) {
    match serde_json::to_string(products) {
        Ok(payload) => {
            if let Err(e) = state.cache().set(FEATURED_CACHE_KEY, &payload).await {
                tracing::warn!(error = %e, "Featured-products cache write failed");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Featured products failed to serialize for cache");
        }
    }
}
