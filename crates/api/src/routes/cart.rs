//! Cart route handlers.
//!
//! The cart lives on the user document as `{product, quantity}` lines.
//! Handlers re-fetch the document rather than trusting the guard's
//! projection, so concurrent requests mutate the latest cart.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tamarind_core::{ProductId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::{CartItem, CartItemView, ProductResponse, User};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// A cart line hydrated with its product for `GET /api/cart`.
#[derive(Debug, Serialize)]
pub struct CartProduct {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    /// Absent means clear the whole cart.
    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

async fn fetch_account(state: &AppState, id: UserId) -> Result<User> {
    state
        .users()
        .find_by_id(id)
        .await
        .map_err(AuthError::from)?
        .ok_or_else(|| AuthError::UserNotFound.into())
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    ProductId::parse(id).map_err(|_| AppError::BadRequest("Invalid product id".to_string()))
}

fn views(items: &[CartItem]) -> Vec<CartItemView> {
    items.iter().map(CartItemView::from).collect()
}

/// `GET /api/cart`
pub async fn index(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartProduct>>> {
    let account = fetch_account(&state, user.id).await?;
    let ids: Vec<ProductId> = account.cart_items.iter().map(|item| item.product).collect();
    let products = state.products().find_by_ids(&ids).await?;

    let lines = products
        .iter()
        .map(|product| CartProduct {
            product: ProductResponse::from(product),
            quantity: account
                .cart_items
                .iter()
                .find(|item| item.product == product.id)
                .map_or(1, |item| item.quantity),
        })
        .collect();
    Ok(Json(lines))
}

/// `POST /api/cart`
///
/// Adds a line for the product, or bumps the quantity if one exists.
pub async fn add(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Vec<CartItemView>>> {
    let product_id = parse_product_id(&body.product_id)?;
    if state.products().find_by_id(product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let mut account = fetch_account(&state, user.id).await?;
    match account
        .cart_items
        .iter_mut()
        .find(|item| item.product == product_id)
    {
        Some(item) => item.quantity = item.quantity.saturating_add(1),
        None => account.cart_items.push(CartItem {
            product: product_id,
            quantity: 1,
        }),
    }

    state
        .users()
        .update_cart(account.id, &account.cart_items)
        .await?;
    Ok(Json(views(&account.cart_items)))
}

/// `DELETE /api/cart`
///
/// Removes one product's line, or every line if no product is named.
pub async fn remove(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<Vec<CartItemView>>> {
    let mut account = fetch_account(&state, user.id).await?;

    match body.product_id {
        Some(id) => {
            let product_id = parse_product_id(&id)?;
            account.cart_items.retain(|item| item.product != product_id);
        }
        None => account.cart_items.clear(),
    }

    state
        .users()
        .update_cart(account.id, &account.cart_items)
        .await?;
    Ok(Json(views(&account.cart_items)))
}

/// `PUT /api/cart/{id}`
///
/// Sets a line's quantity; zero removes the line.
pub async fn update_quantity(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<Vec<CartItemView>>> {
    let product_id = parse_product_id(&id)?;
    let mut account = fetch_account(&state, user.id).await?;

    if !account
        .cart_items
        .iter()
        .any(|item| item.product == product_id)
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    if body.quantity == 0 {
        account.cart_items.retain(|item| item.product != product_id);
    } else if let Some(item) = account
        .cart_items
        .iter_mut()
        .find(|item| item.product == product_id)
    {
        item.quantity = body.quantity;
    }

    state
        .users()
        .update_cart(account.id, &account.cart_items)
        .await?;
    Ok(Json(views(&account.cart_items)))
}
