//! Address repository.

use sqlx::PgPool;

use bella_store_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::address::Address;

/// Fields for creating or replacing an address.
#[derive(Debug, Clone)]
pub struct AddressFields {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub department: String,
    pub postal_code: Option<String>,
    pub is_default: bool,
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(addresses)
    }

    /// Get an address by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        let address =
            sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(address)
    }

    /// Create an address. If it is marked default, the user's other
    /// addresses lose the flag in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let address = sqlx::query_as::<_, Address>(
            "INSERT INTO addresses \
             (user_id, full_name, phone, street, city, department, postal_code, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(&fields.full_name)
        .bind(&fields.phone)
        .bind(&fields.street)
        .bind(&fields.city)
        .bind(&fields.department)
        .bind(&fields.postal_code)
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(address)
    }

    /// Replace an address's fields, preserving single-default semantics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to someone else.
    pub async fn update(
        &self,
        id: AddressId,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND id <> $2")
                .bind(user_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let address = sqlx::query_as::<_, Address>(
            "UPDATE addresses SET \
               full_name = $3, phone = $4, street = $5, city = $6, department = $7, \
               postal_code = $8, is_default = $9, updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.full_name)
        .bind(&fields.phone)
        .bind(&fields.street)
        .bind(&fields.city)
        .bind(&fields.department)
        .bind(&fields.postal_code)
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;
        Ok(address)
    }

    /// Delete an address.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AddressId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
