//! Cart tests: guard, line arithmetic, hydration.

use axum::http::StatusCode;
use serde_json::json;
use tamarind_integration_tests::TestApp;

#[tokio::test]
async fn cart_requires_authentication() {
    let app = TestApp::new();
    let resp = app.get("/api/cart", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adding_the_same_product_bumps_the_quantity() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);
    let body = json!({ "productId": product.id.to_hex() });

    let first = app.post("/api/cart", body.clone(), Some(&cookies)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, json!([{ "product": product.id.to_hex(), "quantity": 1 }]));

    let second = app.post("/api/cart", body, Some(&cookies)).await;
    assert_eq!(second.body[0]["quantity"], 2);
}

#[tokio::test]
async fn quantity_saturates_instead_of_overflowing() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);
    let uri = format!("/api/cart/{}", product.id.to_hex());
    let body = json!({ "productId": product.id.to_hex() });

    app.post("/api/cart", body.clone(), Some(&cookies)).await;
    app.put(&uri, json!({ "quantity": u32::MAX }), Some(&cookies)).await;

    let resp = app.post("/api/cart", body, Some(&cookies)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body[0]["quantity"], u32::MAX);
}

#[tokio::test]
async fn adding_an_unknown_product_is_not_found() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;

    let resp = app
        .post("/api/cart", json!({ "productId": "0".repeat(24) }), Some(&cookies))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "Product not found");

    let bad = app
        .post("/api/cart", json!({ "productId": "nonsense" }), Some(&cookies))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_listing_hydrates_products_with_quantities() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;
    let shirt = app.seed_product("Linen shirt", "shirts", 2999, false);
    let hat = app.seed_product("Straw hat", "hats", 1599, false);

    let shirt_body = json!({ "productId": shirt.id.to_hex() });
    app.post("/api/cart", shirt_body.clone(), Some(&cookies)).await;
    app.post("/api/cart", shirt_body, Some(&cookies)).await;
    app.post("/api/cart", json!({ "productId": hat.id.to_hex() }), Some(&cookies))
        .await;

    let resp = app.get("/api/cart", Some(&cookies)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let lines = resp.body.as_array().unwrap();
    assert_eq!(lines.len(), 2);

    let shirt_line = lines
        .iter()
        .find(|l| l["_id"] == shirt.id.to_hex())
        .unwrap();
    assert_eq!(shirt_line["quantity"], 2);
    assert_eq!(shirt_line["name"], "Linen shirt");
    assert_eq!(shirt_line["price"], "29.99");
}

#[tokio::test]
async fn updating_quantity_sets_and_removes_lines() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);
    let uri = format!("/api/cart/{}", product.id.to_hex());

    app.post("/api/cart", json!({ "productId": product.id.to_hex() }), Some(&cookies))
        .await;

    let set = app.put(&uri, json!({ "quantity": 5 }), Some(&cookies)).await;
    assert_eq!(set.status, StatusCode::OK);
    assert_eq!(set.body[0]["quantity"], 5);

    let removed = app.put(&uri, json!({ "quantity": 0 }), Some(&cookies)).await;
    assert_eq!(removed.body, json!([]));

    // The line is gone, so another update misses.
    let missing = app.put(&uri, json!({ "quantity": 1 }), Some(&cookies)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Product not found");
}

#[tokio::test]
async fn delete_removes_one_line_or_clears_the_cart() {
    let app = TestApp::new();
    let (cookies, _) = app.signup_session("Ada", "ada@example.com").await;
    let shirt = app.seed_product("Linen shirt", "shirts", 2999, false);
    let hat = app.seed_product("Straw hat", "hats", 1599, false);

    app.post("/api/cart", json!({ "productId": shirt.id.to_hex() }), Some(&cookies))
        .await;
    app.post("/api/cart", json!({ "productId": hat.id.to_hex() }), Some(&cookies))
        .await;

    let resp = app
        .delete("/api/cart", json!({ "productId": shirt.id.to_hex() }), Some(&cookies))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["product"], hat.id.to_hex());

    let cleared = app.delete("/api/cart", json!({}), Some(&cookies)).await;
    assert_eq!(cleared.body, json!([]));
}

#[tokio::test]
async fn carts_are_per_user() {
    let app = TestApp::new();
    let (ada, _) = app.signup_session("Ada", "ada@example.com").await;
    let (bob, _) = app.signup_session("Bob", "bob@example.com").await;
    let product = app.seed_product("Linen shirt", "shirts", 2999, false);

    app.post("/api/cart", json!({ "productId": product.id.to_hex() }), Some(&ada))
        .await;

    let bobs = app.get("/api/cart", Some(&bob)).await;
    assert_eq!(bobs.body, json!([]));
}
