//! Category repository.

use sqlx::PgPool;

use bella_store_core::CategoryId;

use super::RepositoryError;
use crate::models::category::{Category, CategoryWithCount};

/// Fields for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update for a category; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(sqlx::FromRow)]
struct CategoryWithCountRow {
    #[sqlx(flatten)]
    category: Category,
    product_count: i64,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active categories with their active product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows: Vec<CategoryWithCountRow> = sqlx::query_as(
            "SELECT c.*, \
               (SELECT COUNT(*) FROM products p \
                 WHERE p.category_id = c.id AND p.is_active = TRUE) AS product_count \
             FROM categories c \
             WHERE c.is_active = TRUE \
             ORDER BY c.name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryWithCount {
                category: row.category,
                product_count: row.product_count,
            })
            .collect())
    }

    /// Get an active category by slug, with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryWithCount>, RepositoryError> {
        let row: Option<CategoryWithCountRow> = sqlx::query_as(
            "SELECT c.*, \
               (SELECT COUNT(*) FROM products p \
                 WHERE p.category_id = c.id AND p.is_active = TRUE) AS product_count \
             FROM categories c \
             WHERE c.slug = $1 AND c.is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| CategoryWithCount {
            category: row.category,
            product_count: row.product_count,
        }))
    }

    /// Look up a category ID by slug (used by the importer and seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn id_by_slug(&self, slug: &str) -> Result<Option<CategoryId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(id)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    pub async fn create(&self, new: &NewCategory) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug, description, image_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "category slug"))?;

        Ok(category)
    }

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               image_url = COALESCE($4, image_url), \
               is_active = COALESCE($5, is_active), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(category)
    }

    /// Soft-delete a category by clearing its active flag.
    ///
    /// Its products keep their category_id; they just stop being reachable
    /// through the category listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn deactivate(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE categories SET is_active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
