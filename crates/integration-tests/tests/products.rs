//! Product catalog tests: admin gating, featured cache, CRUD.

use axum::http::StatusCode;
use serde_json::json;
use tamarind_api::cache::KeyValueStore;
use tamarind_integration_tests::TestApp;

#[tokio::test]
async fn product_list_is_admin_only() {
    let app = TestApp::new();
    app.seed_product("Linen shirt", "shirts", 2999, false);

    let anonymous = app.get("/api/products", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let (customer, _) = app.signup_session("Ada", "ada@example.com").await;
    let forbidden = app.get("/api/products", Some(&customer)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.message(), "Access denied - Admin only");

    let admin = app.signup_admin_session("Root", "root@example.com").await;
    let allowed = app.get("/api/products", Some(&admin)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn featured_products_populate_the_cache() {
    let app = TestApp::new();
    let product = app.seed_product("Linen shirt", "shirts", 2999, true);
    app.seed_product("Plain shirt", "shirts", 1999, false);

    let resp = app.get("/api/products/featured", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let listed = resp.body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["_id"], product.id.to_hex());
    assert_eq!(listed[0]["isFeatured"], true);
    assert_eq!(listed[0]["price"], "29.99");

    let cached = app.cache.get("featured_products").await.unwrap();
    assert!(cached.is_some());
}

#[tokio::test]
async fn featured_products_are_served_from_cache() {
    let app = TestApp::new();
    app.seed_product("Linen shirt", "shirts", 2999, true);

    let first = app.get("/api/products/featured", None).await;
    assert_eq!(first.body.as_array().unwrap().len(), 1);

    // A catalog change without a cache rebuild is not visible yet.
    app.seed_product("Straw hat", "hats", 1599, true);
    let second = app.get("/api/products/featured", None).await;
    assert_eq!(second.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn featured_products_empty_is_not_found() {
    let app = TestApp::new();
    app.seed_product("Plain shirt", "shirts", 1999, false);

    let resp = app.get("/api/products/featured", None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "No featured products found");
}

#[tokio::test]
async fn create_product_validates_and_returns_created() {
    let app = TestApp::new();
    let admin = app.signup_admin_session("Root", "root@example.com").await;

    let bad = app
        .post(
            "/api/products",
            json!({ "name": "", "description": "", "price": "-1", "category": "" }),
            Some(&admin),
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let good = app
        .post(
            "/api/products",
            json!({
                "name": "Linen shirt",
                "description": "A shirt",
                "price": "29.99",
                "category": "shirts"
            }),
            Some(&admin),
        )
        .await;
    assert_eq!(good.status, StatusCode::CREATED);
    assert_eq!(good.body["name"], "Linen shirt");
    assert_eq!(good.body["isFeatured"], false);
    assert!(good.body["_id"].as_str().unwrap().len() == 24);
}

#[tokio::test]
async fn delete_product_handles_unknown_ids() {
    let app = TestApp::new();
    let admin = app.signup_admin_session("Root", "root@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);

    let missing = app
        .delete(
            &format!("/api/products/{}", "0".repeat(24)),
            json!({}),
            Some(&admin),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Product not found");

    let deleted = app
        .delete(
            &format!("/api/products/{}", product.id.to_hex()),
            json!({}),
            Some(&admin),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), "Product deleted successfully");
}

#[tokio::test]
async fn toggle_featured_updates_product_and_cache() {
    let app = TestApp::new();
    let admin = app.signup_admin_session("Root", "root@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);

    let resp = app
        .patch(&format!("/api/products/{}", product.id.to_hex()), Some(&admin))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["isFeatured"], true);

    let cached = app.cache.get("featured_products").await.unwrap().unwrap();
    assert!(cached.contains(&product.id.to_hex()));

    // Toggling back empties the cached list.
    let resp = app
        .patch(&format!("/api/products/{}", product.id.to_hex()), Some(&admin))
        .await;
    assert_eq!(resp.body["isFeatured"], false);
    let cached = app.cache.get("featured_products").await.unwrap().unwrap();
    assert_eq!(cached, "[]");
}

#[tokio::test]
async fn category_listing_is_public() {
    let app = TestApp::new();
    app.seed_product("Linen shirt", "shirts", 2999, false);
    app.seed_product("Straw hat", "hats", 1599, false);

    let resp = app.get("/api/products/category/shirts", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let products = resp.body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["category"], "shirts");

    let empty = app.get("/api/products/category/shoes", None).await;
    assert_eq!(empty.body["products"], json!([]));
}

#[tokio::test]
async fn recommendations_sample_four_products() {
    let app = TestApp::new();
    for i in 0..6 {
        app.seed_product(&format!("Product {i}"), "misc", 1000 + i, false);
    }

    let resp = app.get("/api/products/recommendations", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().unwrap().len(), 4);
}
