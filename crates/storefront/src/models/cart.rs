//! Cart models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bella_store_core::{CartItemId, Price, ProductId, UserId};

use super::product::Product;

/// A line in a user's cart.
///
/// One row per (user, product) pair; adding the same product again bumps the
/// quantity instead of creating a second row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart item with its product attached, for cart responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

/// A checkout-ready cart line: the quantity requested plus a snapshot of the
/// product's current price and stock.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub stock: i32,
    pub quantity: i32,
}

/// Totals for the cart view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
    pub item_count: i64,
    pub free_shipping_threshold: Price,
    pub qualifies_for_free_shipping: bool,
}

/// The full cart response: items plus computed totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemWithProduct>,
    pub summary: CartSummary,
}
