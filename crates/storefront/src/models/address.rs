//! Shipping address model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bella_store_core::{AddressId, UserId};

/// A user's shipping address.
///
/// At most one address per user is the default; setting a new default clears
/// the flag on the others.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub department: String,
    pub postal_code: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
