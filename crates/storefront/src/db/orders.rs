//! Order repository.
//!
//! Read side of orders plus the back-office status mutations. Order creation
//! happens inside the checkout transaction in the service layer, not here.

use std::collections::HashMap;

use sqlx::PgPool;

use bella_store_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use super::RepositoryError;
use crate::models::address::Address;
use crate::models::order::{CustomerSummary, Order, OrderItemView, OrderView};

const ORDER_ITEM_VIEW_COLUMNS: &str =
    "oi.id, oi.order_id, oi.product_id, p.name AS product_name, p.images AS product_images, \
     oi.quantity, oi.unit_price, oi.subtotal";

#[derive(sqlx::FromRow)]
struct BackOfficeOrderRow {
    #[sqlx(flatten)]
    order: Order,
    #[sqlx(flatten)]
    customer: CustomerSummary,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderView>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.with_items(orders.into_iter().map(|o| (o, None)).collect())
            .await
    }

    /// List all orders with their items and purchasers, newest first
    /// (back office).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderView>, RepositoryError> {
        let rows: Vec<BackOfficeOrderRow> = sqlx::query_as(
            "SELECT o.*, u.email, u.first_name, u.last_name \
             FROM orders o JOIN users u ON u.id = o.user_id \
             ORDER BY o.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        self.with_items(
            rows.into_iter()
                .map(|row| (row.order, Some(row.customer)))
                .collect(),
        )
        .await
    }

    /// Get one of a user's orders with items and shipping address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_owned(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderView>, RepositoryError> {
        let order =
            sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        match order {
            Some(order) => Ok(Some(self.into_view(order).await?)),
            None => Ok(None),
        }
    }

    /// Get any order with items and shipping address (back office).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderView>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match order {
            Some(order) => Ok(Some(self.into_view(order).await?)),
            None => Ok(None),
        }
    }

    /// Update an order's fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    /// Update an order's payment status and optional gateway payment ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_payment(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET payment_status = $2, \
               payment_id = COALESCE($3, payment_id), updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(payment_status)
        .bind(payment_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    async fn into_view(&self, order: Order) -> Result<OrderView, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemView>(&format!(
            "SELECT {ORDER_ITEM_VIEW_COLUMNS} \
             FROM order_items oi JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = $1 ORDER BY oi.id ASC"
        ))
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
            .bind(order.address_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(OrderView {
            order,
            items,
            address,
            customer: None,
        })
    }

    /// Attach items to a batch of orders with a single query.
    async fn with_items(
        &self,
        orders: Vec<(Order, Option<CustomerSummary>)>,
    ) -> Result<Vec<OrderView>, RepositoryError> {
        let ids: Vec<i32> = orders.iter().map(|(o, _)| o.id.as_i32()).collect();

        let items = sqlx::query_as::<_, OrderItemView>(&format!(
            "SELECT {ORDER_ITEM_VIEW_COLUMNS} \
             FROM order_items oi JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = ANY($1) ORDER BY oi.id ASC"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItemView>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|(order, customer)| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderView {
                    order,
                    items,
                    address: None,
                    customer,
                }
            })
            .collect())
    }
}
