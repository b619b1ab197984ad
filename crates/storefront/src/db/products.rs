//! Product repository.
//!
//! Catalog listing supports the public filter set (category, material, text
//! search, price range, featured) with pagination; writes are back-office
//! only. Stock is never mutated here - the checkout transaction owns the
//! guarded decrement.

use sqlx::{PgPool, Postgres, QueryBuilder};

use bella_store_core::{CategoryId, Price, ProductId};

use super::RepositoryError;
use crate::models::category::CategorySummary;
use crate::models::product::{Product, ProductWithCategory};

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Name,
    #[default]
    Newest,
}

impl ProductSort {
    const fn order_by(self) -> &'static str {
        match self {
            Self::PriceAsc => " ORDER BY p.price ASC",
            Self::PriceDesc => " ORDER BY p.price DESC",
            Self::Name => " ORDER BY p.name ASC",
            Self::Newest => " ORDER BY p.created_at DESC",
        }
    }
}

/// Filters for the product listing. All fields are optional and combine
/// with AND; only active products are ever returned.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub material: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub featured: bool,
    pub sort: ProductSort,
}

/// A pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 12;
    pub const MAX_LIMIT: i64 = 100;

    /// Build a page from raw query parameters, clamping to sane bounds.
    #[must_use]
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    const fn offset(self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Total page count for `total` matching rows.
    #[must_use]
    pub fn total_pages(self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock: i32,
    pub images: Vec<String>,
    pub material: Option<String>,
    pub category_id: CategoryId,
    pub is_featured: bool,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub material: Option<String>,
    pub category_id: Option<CategoryId>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

const PRODUCT_WITH_CATEGORY_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.price, \
     p.stock, p.images, p.material, p.category_id, p.is_featured, p.is_active, \
     p.created_at, p.updated_at, c.id AS cat_id, c.name AS cat_name, c.slug AS cat_slug";

#[derive(sqlx::FromRow)]
struct ProductWithCategoryRow {
    #[sqlx(flatten)]
    product: Product,
    cat_id: CategoryId,
    cat_name: String,
    cat_slug: String,
}

impl From<ProductWithCategoryRow> for ProductWithCategory {
    fn from(row: ProductWithCategoryRow) -> Self {
        Self {
            product: row.product,
            category: CategorySummary {
                id: row.cat_id,
                name: row.cat_name,
                slug: row.cat_slug,
            },
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching `filter`, plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> Result<(Vec<ProductWithCategory>, i64), RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS} \
             FROM products p JOIN categories c ON c.id = p.category_id"
        ));
        push_filters(&mut qb, filter);
        qb.push(filter.sort.order_by());
        qb.push(" LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<ProductWithCategoryRow> =
            qb.build_query_as().fetch_all(self.pool).await?;

        let mut count_qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM products p JOIN categories c ON c.id = p.category_id",
        );
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Get an active product by slug, with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let row: Option<ProductWithCategoryRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS} \
             FROM products p JOIN categories c ON c.id = p.category_id \
             WHERE p.slug = $1 AND p.is_active = TRUE"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a product by ID regardless of active flag (back-office reads).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (name, slug, description, price, stock, images, material, category_id, is_featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(&new.images)
        .bind(&new.material)
        .bind(new.category_id)
        .bind(new.is_featured)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "product slug"))?;

        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               price = COALESCE($4, price), \
               stock = COALESCE($5, stock), \
               images = COALESCE($6, images), \
               material = COALESCE($7, material), \
               category_id = COALESCE($8, category_id), \
               is_featured = COALESCE($9, is_featured), \
               is_active = COALESCE($10, is_active), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.stock)
        .bind(&update.images)
        .bind(&update.material)
        .bind(update.category_id)
        .bind(update.is_featured)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Soft-delete a product by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn deactivate(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Append the WHERE clause for `filter` to a query builder.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE p.is_active = TRUE");

    if let Some(category) = &filter.category {
        qb.push(" AND c.slug = ");
        qb.push_bind(category.clone());
    }
    if let Some(material) = &filter.material {
        qb.push(" AND p.material ILIKE ");
        qb.push_bind(format!("%{material}%"));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (p.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND p.price >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND p.price <= ");
        qb.push_bind(max);
    }
    if filter.featured {
        qb.push(" AND p.is_featured = TRUE");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamping() {
        let page = Page::clamped(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, Page::DEFAULT_LIMIT);

        let page = Page::clamped(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, Page::MAX_LIMIT);

        let page = Page::clamped(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_total_pages() {
        let page = Page::clamped(Some(1), Some(12));
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(12), 1);
        assert_eq!(page.total_pages(13), 2);
    }

    #[test]
    fn test_sort_parses_from_query_values() {
        let sort: ProductSort = serde_json::from_str("\"price-asc\"").expect("parse");
        assert_eq!(sort, ProductSort::PriceAsc);
        let sort: ProductSort = serde_json::from_str("\"newest\"").expect("parse");
        assert_eq!(sort, ProductSort::Newest);
    }
}
