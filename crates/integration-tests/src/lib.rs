//! Integration test support for `BellaStore`.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p bella-store-cli -- migrate
//!
//! # Start the storefront
//! cargo run -p bella-store-storefront
//!
//! # Run the ignored integration tests
//! cargo test -p bella-store-integration-tests -- --ignored
//! ```
//!
//! Tests talk to the running server over HTTP with a cookie-holding client
//! and inspect the database directly through a second connection.

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared context for one test: an HTTP client with its own cookie jar and
/// a direct database connection.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the server and database named by the environment.
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or the database is unreachable.
    pub async fn new() -> Self {
        let base_url = std::env::var("STOREFRONT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to database");

        Self {
            client,
            base_url,
            pool,
        }
    }

    /// A fresh context sharing the database but with its own cookie jar,
    /// for tests that need several signed-in users at once.
    #[must_use]
    pub fn new_session(&self) -> Self {
        Self {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: self.base_url.clone(),
            pool: self.pool.clone(),
        }
    }

    /// Register a throwaway user and leave the client signed in.
    ///
    /// Returns the new user's email.
    pub async fn register_user(&self) -> String {
        let email = format!("test-{}@example.com", Uuid::new_v4());
        let resp = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&json!({
                "email": email,
                "password": "integration-pw",
                "firstName": "Test",
                "lastName": "User",
            }))
            .send()
            .await
            .expect("register request failed");
        assert!(
            resp.status().is_success(),
            "registration failed: {}",
            resp.status()
        );
        email
    }

    /// Create an address for the signed-in user; returns its ID.
    pub async fn create_address(&self) -> i64 {
        let resp = self
            .client
            .post(format!("{}/api/account/addresses", self.base_url))
            .json(&json!({
                "fullName": "Test User",
                "phone": "3000000000",
                "street": "Calle 1 #2-3",
                "city": "Bogotá",
                "department": "Cundinamarca",
                "isDefault": true,
            }))
            .send()
            .await
            .expect("address request failed");
        assert!(resp.status().is_success());

        let body: Value = resp.json().await.expect("address response not JSON");
        body["data"]["id"].as_i64().expect("address id missing")
    }

    /// Insert a product straight into the database; returns its ID.
    ///
    /// Test products hang off a dedicated category created on demand.
    pub async fn create_product(&self, price: i64, stock: i32) -> i32 {
        let slug = format!("it-{}", Uuid::new_v4());

        sqlx::query(
            "INSERT INTO categories (name, slug, description) \
             VALUES ('Integration', 'integration-tests', 'test fixtures') \
             ON CONFLICT (slug) DO NOTHING",
        )
        .execute(&self.pool)
        .await
        .expect("category insert failed");

        sqlx::query_scalar::<_, i32>(
            "INSERT INTO products (name, slug, description, price, stock, category_id) \
             SELECT $1, $2, 'integration test product', $3, $4, c.id \
             FROM categories c WHERE c.slug = 'integration-tests' \
             RETURNING id",
        )
        .bind(format!("Producto {slug}"))
        .bind(&slug)
        .bind(price)
        .bind(stock)
        .fetch_one(&self.pool)
        .await
        .expect("product insert failed")
    }

    /// Add a product to the signed-in user's cart via the API.
    pub async fn add_to_cart(&self, product_id: i32, quantity: i32) {
        let resp = self
            .client
            .post(format!("{}/api/cart/items", self.base_url))
            .json(&json!({ "productId": product_id, "quantity": quantity }))
            .send()
            .await
            .expect("cart request failed");
        assert!(
            resp.status().is_success(),
            "add to cart failed: {}",
            resp.status()
        );
    }

    /// Place an order via the API; returns the raw response.
    pub async fn place_order(&self, address_id: i64) -> reqwest::Response {
        self.client
            .post(format!("{}/api/orders", self.base_url))
            .json(&json!({
                "addressId": address_id,
                "paymentMethod": "cash-on-delivery",
            }))
            .send()
            .await
            .expect("order request failed")
    }

    /// Current stock of a product, read straight from the database.
    pub async fn stock_of(&self, product_id: i32) -> i32 {
        sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .expect("stock query failed")
    }

    /// Number of cart rows the signed-in user's email owns.
    pub async fn cart_rows_for(&self, email: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM cart_items ci \
             JOIN users u ON u.id = ci.user_id WHERE u.email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .expect("cart count query failed")
    }
}
