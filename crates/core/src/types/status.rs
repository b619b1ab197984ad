//! Status and role enums shared across the workspace.
//!
//! Each enum maps to a `PostgreSQL` enum type of the same (snake_case) name
//! and serializes in the casing the JSON API has always used.

use serde::{Deserialize, Serialize};

/// Order fulfillment lifecycle.
///
/// Orders are created `Pending`; every later transition is an administrative
/// action. Orders are immutable after creation except for this field and
/// [`PaymentStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Payment method selected at checkout.
///
/// Recorded as-is on the order; there is no gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    CashOnDelivery,
}

/// User role controlling access to back-office operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

impl UserRole {
    /// Whether this role may perform back-office operations.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_json_casing() {
        let json = serde_json::to_string(&OrderStatus::Shipped).expect("serialize");
        assert_eq!(json, "\"SHIPPED\"");
        let back: OrderStatus = serde_json::from_str("\"CANCELLED\"").expect("deserialize");
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_payment_method_json_casing() {
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).expect("serialize");
        assert_eq!(json, "\"cash-on-delivery\"");
        let back: PaymentMethod = serde_json::from_str("\"bank-transfer\"").expect("deserialize");
        assert_eq!(back, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_only_admins_reach_the_back_office() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Customer.is_admin());
    }
}
