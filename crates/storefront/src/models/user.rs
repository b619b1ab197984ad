//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bella_store_core::{UserId, UserRole};

/// A store user.
///
/// The password hash is never part of this type; repositories that need it
/// return it separately so it cannot leak into a response by accident.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
