//! Integration tests for sessions, authentication, and the cart API.
//!
//! These tests require:
//! - A running PostgreSQL database with migrations applied
//! - A running storefront server (`cargo run -p bella-store-storefront`)
//! - `DATABASE_URL` pointing at the same database the server uses
//!
//! Run with: cargo test -p bella-store-integration-tests -- --ignored

use bella_store_integration_tests::TestContext;
use serde_json::{Value, json};

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_register_then_me() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let resp = ctx
        .client
        .get(format!("{}/api/auth/me", ctx.base_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("me response not JSON");
    assert_eq!(body["data"]["email"].as_str(), Some(email.as_str()));
    assert_eq!(body["data"]["role"].as_str(), Some("CUSTOMER"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_login_rejects_wrong_password() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let fresh = ctx.new_session();
    let resp = fresh
        .client
        .post(format!("{}/api/auth/login", fresh.base_url))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 401);

    // Unknown accounts get the same answer as wrong passwords.
    let resp = fresh
        .client
        .post(format!("{}/api/auth/login", fresh.base_url))
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_logout_ends_the_session() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;

    let resp = ctx
        .client
        .post(format!("{}/api/auth/logout", ctx.base_url))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), 200);

    let resp = ctx
        .client
        .get(format!("{}/api/auth/me", ctx.base_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_cart_requires_a_session() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/api/cart", ctx.base_url))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["success"], false);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_cart_add_rejects_quantities_above_stock() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let product_id = ctx.create_product(20_000, 2).await;

    let resp = ctx
        .client
        .post(format!("{}/api/cart/items", ctx.base_url))
        .json(&json!({ "productId": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_cart_merges_repeat_adds_of_the_same_product() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let product_id = ctx.create_product(20_000, 10).await;

    ctx.add_to_cart(product_id, 2).await;
    ctx.add_to_cart(product_id, 3).await;

    let resp = ctx
        .client
        .get(format!("{}/api/cart", ctx.base_url))
        .send()
        .await
        .expect("cart request failed");
    let body: Value = resp.json().await.expect("cart response not JSON");

    let items = body["data"]["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(body["data"]["summary"]["itemCount"].as_i64(), Some(5));
    assert_eq!(body["data"]["summary"]["subtotal"].as_i64(), Some(100_000));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_cart_totals_cross_the_free_shipping_threshold() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let product_id = ctx.create_product(100_000, 10).await;

    ctx.add_to_cart(product_id, 1).await;
    let resp = ctx
        .client
        .get(format!("{}/api/cart", ctx.base_url))
        .send()
        .await
        .expect("cart request failed");
    let body: Value = resp.json().await.expect("cart response not JSON");
    assert_eq!(body["data"]["summary"]["shippingCost"].as_i64(), Some(10_000));
    assert_eq!(
        body["data"]["summary"]["qualifiesForFreeShipping"],
        Value::Bool(false)
    );

    ctx.add_to_cart(product_id, 1).await;
    let resp = ctx
        .client
        .get(format!("{}/api/cart", ctx.base_url))
        .send()
        .await
        .expect("cart request failed");
    let body: Value = resp.json().await.expect("cart response not JSON");
    assert_eq!(body["data"]["summary"]["shippingCost"].as_i64(), Some(0));
    assert_eq!(
        body["data"]["summary"]["qualifiesForFreeShipping"],
        Value::Bool(true)
    );
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_customers_cannot_manage_the_catalog() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;

    let resp = ctx
        .client
        .post(format!("{}/api/products", ctx.base_url))
        .json(&json!({
            "name": "Intruso",
            "slug": "intruso",
            "description": "should never exist",
            "price": 10_000,
            "stock": 1,
            "categoryId": 1,
        }))
        .send()
        .await
        .expect("product request failed");
    assert_eq!(resp.status(), 403);

    // Category deletion is admin-gated too (403, not 405: the route exists).
    let resp = ctx
        .client
        .delete(format!("{}/api/categories/1", ctx.base_url))
        .send()
        .await
        .expect("category request failed");
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_users_cannot_read_each_others_orders() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let address_id = ctx.create_address().await;
    let product_id = ctx.create_product(30_000, 5).await;
    ctx.add_to_cart(product_id, 1).await;

    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("order response not JSON");
    let order_id = body["data"]["id"].as_i64().expect("order id missing");

    let other = ctx.new_session();
    other.register_user().await;
    let resp = other
        .client
        .get(format!("{}/api/orders/{order_id}", other.base_url))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(resp.status(), 404);
}
