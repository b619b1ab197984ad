//! Session data types and keys.

use serde::{Deserialize, Serialize};

use bella_store_core::{UserId, UserRole};

use super::user::User;

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The authenticated user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user as stored in the session cookie's server-side data.
///
/// Kept deliberately small; anything else is loaded from the database per
/// request when needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
