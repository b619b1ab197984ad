//! Cart routes. All of them require a signed-in user.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;

use bella_store_core::{CartItemId, Price, ProductId};

use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::{CartItemWithProduct, CartSummary, CartView};
use crate::routes::{success, success_with_message};
use crate::services::checkout::ShippingPolicy;
use crate::state::AppState;

/// Compute cart totals from its items under a shipping policy.
fn summarize(items: &[CartItemWithProduct], policy: ShippingPolicy) -> Result<CartSummary> {
    let mut subtotal = Price::ZERO;
    let mut item_count: i64 = 0;
    for item in items {
        let line = item
            .product
            .price
            .times(item.item.quantity)
            .ok_or_else(|| AppError::BadRequest("Cart total out of range".to_string()))?;
        subtotal = subtotal
            .plus(line)
            .ok_or_else(|| AppError::BadRequest("Cart total out of range".to_string()))?;
        item_count += i64::from(item.item.quantity);
    }

    let shipping_cost = policy.cost_for(subtotal);
    let total = subtotal
        .plus(shipping_cost)
        .ok_or_else(|| AppError::BadRequest("Cart total out of range".to_string()))?;

    Ok(CartSummary {
        subtotal,
        shipping_cost,
        total,
        item_count,
        free_shipping_threshold: policy.free_shipping_threshold,
        qualifies_for_free_shipping: shipping_cost.is_zero(),
    })
}

/// GET /api/cart
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let items = CartRepository::new(state.pool())
        .items_with_products(user.id)
        .await?;
    let summary = summarize(&items, state.shipping())?;

    Ok(success(CartView { items, summary }))
}

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// POST /api/cart/items
///
/// Validates the product is active and that the combined quantity (existing
/// cart row + requested) fits the current stock before upserting.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for invalid quantities or insufficient
/// stock, `AppError::NotFound` for unknown or inactive products.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_id(body.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let cart = CartRepository::new(state.pool());
    let existing = cart
        .find_item(user.id, body.product_id)
        .await?
        .map_or(0, |item| item.quantity);

    let combined = existing.saturating_add(body.quantity);
    if !product.has_stock_for(combined) {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock for {}",
            product.name
        )));
    }

    let item = cart.upsert(user.id, body.product_id, body.quantity).await?;
    Ok(success_with_message("Added to cart", item))
}

/// Body for updating a cart item's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// PUT /api/cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::BadRequest` for invalid quantities or insufficient
/// stock, `AppError::NotFound` if the item isn't in this user's cart.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let cart = CartRepository::new(state.pool());
    let item = cart
        .get_owned(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item".to_string()))?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(item.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    if !product.has_stock_for(body.quantity) {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock for {}",
            product.name
        )));
    }

    let item = cart.set_quantity(id, user.id, body.quantity).await?;
    Ok(success(item))
}

/// DELETE /api/cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the item isn't in this user's cart.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
) -> Result<impl IntoResponse> {
    let removed = CartRepository::new(state.pool()).remove(id, user.id).await?;
    if !removed {
        return Err(AppError::NotFound("Cart item".to_string()));
    }
    Ok(success_with_message("Removed from cart", ()))
}

/// DELETE /api/cart
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(success_with_message("Cart cleared", ()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use bella_store_core::{CategoryId, UserId};

    use crate::models::cart::CartItem;
    use crate::models::product::Product;

    use super::*;

    fn policy() -> ShippingPolicy {
        ShippingPolicy {
            free_shipping_threshold: Price::new(200_000),
            flat_fee: Price::new(10_000),
        }
    }

    fn item(price: i64, quantity: i32) -> CartItemWithProduct {
        let now = Utc::now();
        CartItemWithProduct {
            item: CartItem {
                id: CartItemId::new(1),
                user_id: UserId::new(1),
                product_id: ProductId::new(1),
                quantity,
                created_at: now,
                updated_at: now,
            },
            product: Product {
                id: ProductId::new(1),
                name: "Anillo Luna".to_string(),
                slug: "anillo-luna".to_string(),
                description: String::new(),
                price: Price::new(price),
                stock: 10,
                images: vec![],
                material: None,
                category_id: CategoryId::new(1),
                is_featured: false,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = summarize(&[], policy()).expect("summary");
        assert_eq!(summary.subtotal, Price::ZERO);
        assert_eq!(summary.shipping_cost, Price::ZERO);
        assert_eq!(summary.item_count, 0);
        assert!(summary.qualifies_for_free_shipping);
    }

    #[test]
    fn test_summary_below_threshold_charges_flat_fee() {
        let summary = summarize(&[item(89_900, 2)], policy()).expect("summary");
        assert_eq!(summary.subtotal, Price::new(179_800));
        assert_eq!(summary.shipping_cost, Price::new(10_000));
        assert_eq!(summary.total, Price::new(189_800));
        assert_eq!(summary.item_count, 2);
        assert!(!summary.qualifies_for_free_shipping);
    }

    #[test]
    fn test_summary_at_threshold_ships_free() {
        let summary = summarize(&[item(100_000, 2)], policy()).expect("summary");
        assert_eq!(summary.shipping_cost, Price::ZERO);
        assert_eq!(summary.total, Price::new(200_000));
        assert!(summary.qualifies_for_free_shipping);
    }
}
