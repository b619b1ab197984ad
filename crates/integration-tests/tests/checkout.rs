//! Integration tests for order placement.
//!
//! These tests require:
//! - A running PostgreSQL database with migrations applied
//! - A running storefront server (`cargo run -p bella-store-storefront`)
//! - `DATABASE_URL` pointing at the same database the server uses
//!
//! Run with: cargo test -p bella-store-integration-tests -- --ignored

use bella_store_integration_tests::TestContext;
use serde_json::Value;

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_checkout_decrements_stock_and_clears_cart() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let address_id = ctx.create_address().await;
    let product_id = ctx.create_product(30_000, 5).await;

    ctx.add_to_cart(product_id, 2).await;

    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("order response not JSON");
    assert_eq!(body["success"], true);
    let order_number = body["data"]["orderNumber"]
        .as_str()
        .expect("order number missing");
    assert!(order_number.starts_with("ORD-"));

    // Below the free-shipping threshold: 2 x 30,000 + 10,000 flat fee.
    assert_eq!(body["data"]["subtotal"].as_i64(), Some(60_000));
    assert_eq!(body["data"]["shippingCost"].as_i64(), Some(10_000));
    assert_eq!(body["data"]["total"].as_i64(), Some(70_000));

    assert_eq!(ctx.stock_of(product_id).await, 3);
    assert_eq!(ctx.cart_rows_for(&email).await, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_checkout_with_free_shipping() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let address_id = ctx.create_address().await;
    let product_id = ctx.create_product(100_000, 5).await;

    ctx.add_to_cart(product_id, 2).await;

    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("order response not JSON");
    assert_eq!(body["data"]["subtotal"].as_i64(), Some(200_000));
    assert_eq!(body["data"]["shippingCost"].as_i64(), Some(0));
    assert_eq!(body["data"]["total"].as_i64(), Some(200_000));
}

// ============================================================================
// Rollback
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_insufficient_stock_leaves_everything_untouched() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let address_id = ctx.create_address().await;
    let product_id = ctx.create_product(25_000, 5).await;

    ctx.add_to_cart(product_id, 3).await;

    // Stock drops after the item entered the cart.
    sqlx::query("UPDATE products SET stock = 1 WHERE id = $1")
        .bind(product_id)
        .execute(&ctx.pool)
        .await
        .expect("stock update failed");

    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["success"], false);

    // Nothing changed: stock intact, cart intact, no order rows.
    assert_eq!(ctx.stock_of(product_id).await, 1);
    assert_eq!(ctx.cart_rows_for(&email).await, 1);

    let orders: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders o \
         JOIN users u ON u.id = o.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&ctx.pool)
    .await
    .expect("order count query failed");
    assert_eq!(orders, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_empty_cart_cannot_check_out() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let address_id = ctx.create_address().await;

    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 400);
}

// ============================================================================
// Price Freeze
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_order_keeps_price_at_time_of_purchase() {
    let ctx = TestContext::new().await;
    ctx.register_user().await;
    let address_id = ctx.create_address().await;
    let product_id = ctx.create_product(45_000, 10).await;

    ctx.add_to_cart(product_id, 1).await;
    let resp = ctx.place_order(address_id).await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("order response not JSON");
    let order_id = body["data"]["id"].as_i64().expect("order id missing");

    // The catalog price changes after the sale.
    sqlx::query("UPDATE products SET price = 99000 WHERE id = $1")
        .bind(product_id)
        .execute(&ctx.pool)
        .await
        .expect("price update failed");

    let frozen: i64 = sqlx::query_scalar(
        "SELECT unit_price FROM order_items WHERE order_id = $1 AND product_id = $2",
    )
    .bind(order_id)
    .bind(product_id)
    .fetch_one(&ctx.pool)
    .await
    .expect("order item query failed");
    assert_eq!(frozen, 45_000);
}

// ============================================================================
// Concurrency
// ============================================================================

/// Six buyers race for three units; exactly three orders may succeed and
/// stock may never go negative.
#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_concurrent_checkouts_never_oversell() {
    const BUYERS: usize = 6;
    const STOCK: i32 = 3;

    let ctx = TestContext::new().await;
    let product_id = ctx.create_product(30_000, STOCK).await;

    // Each buyer gets their own session, address, and cart up front.
    let mut buyers = Vec::with_capacity(BUYERS);
    for _ in 0..BUYERS {
        let buyer = ctx.new_session();
        buyer.register_user().await;
        let address_id = buyer.create_address().await;
        buyer.add_to_cart(product_id, 1).await;
        buyers.push((buyer, address_id));
    }

    let mut tasks = tokio::task::JoinSet::new();
    for (buyer, address_id) in buyers {
        tasks.spawn(async move {
            let resp = buyer.place_order(address_id).await;
            resp.status().as_u16()
        });
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    while let Some(status) = tasks.join_next().await {
        match status.expect("checkout task panicked") {
            201 => succeeded += 1,
            400 => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(succeeded, STOCK);
    assert_eq!(rejected, BUYERS - STOCK as usize);
    assert_eq!(ctx.stock_of(product_id).await, 0);
}
