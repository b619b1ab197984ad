//! Order placement.
//!
//! The pipeline runs in four stages: load the cart lines, validate stock
//! against them (pure, no side effects), assemble the order totals and
//! number (pure), then commit everything in a single transaction.
//!
//! The transaction is the only place stock is ever decremented, and the
//! decrement is guarded (`WHERE stock >= quantity`), so two checkouts racing
//! over the last unit cannot both win: the loser's update matches zero rows
//! and the whole transaction rolls back.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use bella_store_core::{AddressId, OrderId, PaymentMethod, Price, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::cart::CartLine;
use crate::models::order::OrderView;

/// Length of the random suffix in an order number.
const ORDER_NUMBER_SUFFIX_LEN: usize = 9;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more units than the product has.
    #[error("insufficient stock for {product}")]
    InsufficientStock {
        /// Display name of the product that ran out.
        product: String,
    },

    /// A cart line's totals overflow the price range.
    #[error("order total out of range")]
    TotalOutOfRange,

    /// Database failure; the transaction was rolled back.
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Persistence(RepositoryError::Database(e))
    }
}

/// Shipping cost rules, taken from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct ShippingPolicy {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Price,
    /// Flat fee charged below the threshold.
    pub flat_fee: Price,
}

impl ShippingPolicy {
    /// Shipping cost for a given subtotal.
    #[must_use]
    pub fn cost_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// What the customer submits to place an order.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Shipping address; the caller must have verified ownership.
    pub address_id: AddressId,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Computed order totals plus the generated order number.
#[derive(Debug, Clone)]
struct OrderDraft {
    order_number: String,
    subtotal: Price,
    shipping_cost: Price,
    total: Price,
}

/// Place an order from the user's current cart.
///
/// Loads the cart, validates stock, computes totals with prices frozen at
/// their current values, and commits the order, its items, the stock
/// decrements, and the cart clear atomically.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] if the cart has no lines.
/// - [`CheckoutError::InsufficientStock`] if any line exceeds available
///   stock, either up front or because a concurrent order won the race.
/// - [`CheckoutError::Persistence`] for database failures.
#[instrument(skip(pool, request), fields(user_id = %user_id))]
pub async fn place_order(
    pool: &PgPool,
    user_id: UserId,
    request: &CheckoutRequest,
    policy: ShippingPolicy,
) -> Result<OrderView, CheckoutError> {
    let lines = CartRepository::new(pool).lines_for_checkout(user_id).await?;
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    validate_stock(&lines)?;
    let draft = assemble(&lines, policy)?;

    let order_id = commit(pool, user_id, request, &draft, &lines).await?;

    OrderRepository::new(pool)
        .get_owned(order_id, user_id)
        .await?
        .ok_or(CheckoutError::Persistence(RepositoryError::NotFound))
}

/// Check every line against current stock. Pure; no side effects.
fn validate_stock(lines: &[CartLine]) -> Result<(), CheckoutError> {
    for line in lines {
        if line.quantity > line.stock {
            return Err(CheckoutError::InsufficientStock {
                product: line.product_name.clone(),
            });
        }
    }
    Ok(())
}

/// Compute totals and generate the order number. Pure aside from the clock
/// and RNG feeding the order number.
fn assemble(lines: &[CartLine], policy: ShippingPolicy) -> Result<OrderDraft, CheckoutError> {
    let mut subtotal = Price::ZERO;
    for line in lines {
        let line_total = line
            .unit_price
            .times(line.quantity)
            .ok_or(CheckoutError::TotalOutOfRange)?;
        subtotal = subtotal
            .plus(line_total)
            .ok_or(CheckoutError::TotalOutOfRange)?;
    }

    let shipping_cost = policy.cost_for(subtotal);
    let total = subtotal
        .plus(shipping_cost)
        .ok_or(CheckoutError::TotalOutOfRange)?;

    Ok(OrderDraft {
        order_number: generate_order_number(),
        subtotal,
        shipping_cost,
        total,
    })
}

/// Generate an order number: `ORD-{unix millis}-{9 random uppercase alnums}`.
///
/// Uniqueness is enforced by the database constraint, not by this function.
fn generate_order_number() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_NUMBER_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();

    format!("ORD-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Run the commit phase: order + items, guarded stock decrements, cart clear.
async fn commit(
    pool: &PgPool,
    user_id: UserId,
    request: &CheckoutRequest,
    draft: &OrderDraft,
    lines: &[CartLine],
) -> Result<OrderId, CheckoutError> {
    let mut tx = pool.begin().await?;

    let order_id = sqlx::query_scalar::<_, OrderId>(
        "INSERT INTO orders \
         (order_number, user_id, address_id, subtotal, shipping_cost, total, \
          payment_method, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(&draft.order_number)
    .bind(user_id)
    .bind(request.address_id)
    .bind(draft.subtotal)
    .bind(draft.shipping_cost)
    .bind(draft.total)
    .bind(request.payment_method)
    .bind(&request.notes)
    .fetch_one(&mut *tx)
    .await?;

    for line in lines {
        let line_subtotal = line
            .unit_price
            .times(line.quantity)
            .ok_or(CheckoutError::TotalOutOfRange)?;

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line_subtotal)
        .execute(&mut *tx)
        .await?;

        // The guard makes the decrement a no-op when stock already dropped
        // below the requested quantity; that means a concurrent order beat
        // us to the units since validation.
        let decremented = sqlx::query(
            "UPDATE products SET stock = stock - $2, updated_at = now() \
             WHERE id = $1 AND stock >= $2",
        )
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CheckoutError::InsufficientStock {
                product: line.product_name.clone(),
            });
        }
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use bella_store_core::ProductId;

    use super::*;

    fn policy() -> ShippingPolicy {
        ShippingPolicy {
            free_shipping_threshold: Price::new(200_000),
            flat_fee: Price::new(10_000),
        }
    }

    fn line(name: &str, unit_price: i64, stock: i32, quantity: i32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            product_name: name.to_string(),
            unit_price: Price::new(unit_price),
            stock,
            quantity,
        }
    }

    #[test]
    fn test_flat_fee_below_threshold() {
        let draft = assemble(&[line("Anillo Luna", 189_900, 5, 1)], policy()).expect("assemble");
        assert_eq!(draft.subtotal, Price::new(189_900));
        assert_eq!(draft.shipping_cost, Price::new(10_000));
        assert_eq!(draft.total, Price::new(199_900));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let draft = assemble(&[line("Collar Sol", 100_000, 5, 2)], policy()).expect("assemble");
        assert_eq!(draft.subtotal, Price::new(200_000));
        assert_eq!(draft.shipping_cost, Price::ZERO);
        assert_eq!(draft.total, Price::new(200_000));
    }

    #[test]
    fn test_subtotal_sums_across_lines() {
        let lines = vec![
            line("Anillo Luna", 89_900, 5, 2),
            line("Pulsera Mar", 45_000, 3, 1),
        ];
        let draft = assemble(&lines, policy()).expect("assemble");
        assert_eq!(draft.subtotal, Price::new(224_800));
        assert_eq!(draft.shipping_cost, Price::ZERO);
    }

    #[test]
    fn test_validate_stock_passes_at_exact_stock() {
        assert!(validate_stock(&[line("Anillo", 89_900, 3, 3)]).is_ok());
    }

    #[test]
    fn test_validate_stock_names_the_offending_product() {
        let lines = vec![
            line("Anillo Luna", 89_900, 5, 1),
            line("Collar Sol", 120_000, 1, 2),
        ];
        match validate_stock(&lines) {
            Err(CheckoutError::InsufficientStock { product }) => {
                assert_eq!(product, "Collar Sol");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        let mut parts = number.splitn(3, '-');
        assert_eq!(parts.next(), Some("ORD"));

        let millis = parts.next().expect("timestamp part");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));

        let suffix = parts.next().expect("suffix part");
        assert_eq!(suffix.len(), ORDER_NUMBER_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_order_numbers_differ() {
        assert_ne!(generate_order_number(), generate_order_number());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let lines = vec![line("Caro", i64::MAX / 2, 10, 3)];
        assert!(matches!(
            assemble(&lines, policy()),
            Err(CheckoutError::TotalOutOfRange)
        ));
    }
}
