//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Products
//! GET  /api/products                - Product listing (filters + pagination)
//! GET  /api/products/{slug}         - Product detail
//! POST /api/products                - Create product (admin)
//! PUT  /api/products/{id}           - Update product (admin)
//! DELETE /api/products/{id}         - Soft-delete product (admin)
//!
//! # Categories
//! GET  /api/categories              - Active categories with product counts
//! GET  /api/categories/{slug}       - Category detail
//! POST /api/categories              - Create category (admin)
//! PUT  /api/categories/{id}         - Update category (admin)
//! DELETE /api/categories/{id}       - Soft-delete category (admin)
//!
//! # Cart (requires auth)
//! GET  /api/cart                    - Cart items + totals
//! POST /api/cart/items              - Add product to cart
//! PUT  /api/cart/items/{id}         - Update quantity
//! DELETE /api/cart/items/{id}       - Remove item
//! DELETE /api/cart                  - Clear cart
//!
//! # Orders (requires auth)
//! POST /api/orders                  - Place order from cart
//! GET  /api/orders                  - Order history (admin: all orders)
//! GET  /api/orders/{id}             - Order detail (owner or admin)
//! PUT  /api/orders/{id}/status      - Update fulfillment status (admin)
//! PUT  /api/orders/{id}/payment     - Update payment status (admin)
//!
//! # Auth
//! POST /api/auth/register           - Create account + session
//! POST /api/auth/login              - Sign in
//! POST /api/auth/logout             - Sign out
//! GET  /api/auth/me                 - Current user
//!
//! # Account (requires auth)
//! PUT  /api/account/profile         - Update profile
//! PUT  /api/account/password        - Change password
//! GET  /api/account/addresses       - List addresses
//! POST /api/account/addresses       - Create address
//! PUT  /api/account/addresses/{id}  - Update address
//! DELETE /api/account/addresses/{id} - Delete address
//! ```
//!
//! All responses share the envelope `{"success": bool, "data"?: ..., "message"?: ...}`.

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Json,
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope wrapping every JSON response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

/// Wrap `data` in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: None,
        data,
    })
}

/// Wrap `data` in the success envelope with a human-readable message.
pub fn success_with_message<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: Some(message.into()),
        data,
    })
}

/// Create the product routes router.
///
/// Reads address products by slug; admin writes address them by numeric ID.
/// Both shapes share one route template so the method routers don't overlap.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{key}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{key}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::remove),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place).get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/payment", put(orders::update_payment))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", put(account::update_profile))
        .route("/password", put(account::change_password))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/account", account_routes())
}
