//! Cart repository.
//!
//! Cart rows are keyed (user, product); quantities are bumped in place. The
//! checkout transaction clears the cart itself - [`CartRepository::clear`]
//! exists for the explicit "empty my cart" operation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bella_store_core::{CartItemId, CategoryId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartItem, CartItemWithProduct, CartLine};
use crate::models::product::Product;

#[derive(sqlx::FromRow)]
struct CartItemWithProductRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    p_name: String,
    p_slug: String,
    p_description: String,
    p_price: Price,
    p_stock: i32,
    p_images: Vec<String>,
    p_material: Option<String>,
    p_category_id: CategoryId,
    p_is_featured: bool,
    p_is_active: bool,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl From<CartItemWithProductRow> for CartItemWithProduct {
    fn from(row: CartItemWithProductRow) -> Self {
        Self {
            item: CartItem {
                id: row.id,
                user_id: row.user_id,
                product_id: row.product_id,
                quantity: row.quantity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            product: Product {
                id: row.product_id,
                name: row.p_name,
                slug: row.p_slug,
                description: row.p_description,
                price: row.p_price,
                stock: row.p_stock,
                images: row.p_images,
                material: row.p_material,
                category_id: row.p_category_id,
                is_featured: row.p_is_featured,
                is_active: row.p_is_active,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            },
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a user's cart items with their products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_products(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartItemWithProduct>, RepositoryError> {
        let rows: Vec<CartItemWithProductRow> = sqlx::query_as(
            "SELECT ci.id, ci.user_id, ci.product_id, ci.quantity, ci.created_at, ci.updated_at, \
               p.name AS p_name, p.slug AS p_slug, p.description AS p_description, \
               p.price AS p_price, p.stock AS p_stock, p.images AS p_images, \
               p.material AS p_material, p.category_id AS p_category_id, \
               p.is_featured AS p_is_featured, p.is_active AS p_is_active, \
               p.created_at AS p_created_at, p.updated_at AS p_updated_at \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Load the user's cart as checkout-ready lines: requested quantity plus
    /// the product's current price and stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_checkout(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT ci.product_id, p.name AS product_name, p.price AS unit_price, \
                    p.stock, ci.quantity \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Find the cart row for a (user, product) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// Get a cart item by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: CartItemId,
        user_id: UserId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item =
            sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(item)
    }

    /// Insert a cart row, or bump the quantity if the product is already in
    /// the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, \
                           updated_at = now() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Replace the quantity of a cart item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist or
    /// belongs to someone else.
    pub async fn set_quantity(
        &self,
        id: CartItemId,
        user_id: UserId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            "UPDATE cart_items SET quantity = $3, updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(item)
    }

    /// Remove a cart item.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, id: CartItemId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all cart rows for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
