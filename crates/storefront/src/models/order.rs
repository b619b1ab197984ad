//! Order models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bella_store_core::{
    AddressId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, Price, ProductId,
    UserId,
};

use super::address::Address;

/// A placed order.
///
/// Immutable after creation except for `status`, `payment_status`, and
/// `payment_id`, which are mutated by back-office actions.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub address_id: AddressId,
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order item joined with the current product name and images for display.
///
/// The price fields are the ones frozen at checkout time, deliberately
/// decoupled from the live product price so historical orders stay stable
/// when catalog prices change.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_images: Vec<String>,
    pub quantity: i32,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// The purchaser, summarized for back-office order listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A full order response: the order, its line items, and the shipping address.
///
/// `customer` is populated only for back-office queries; customers fetching
/// their own orders don't need to be told who they are.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new(7),
            order_number: "ORD-1-ABC123XYZ".to_string(),
            user_id: UserId::new(3),
            address_id: AddressId::new(5),
            subtotal: Price::new(45_000),
            shipping_cost: Price::new(10_000),
            total: Price::new(55_000),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_id: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_back_office_view_carries_the_purchaser() {
        let view = OrderView {
            order: order(),
            items: vec![],
            address: None,
            customer: Some(CustomerSummary {
                email: "cliente@bellastore.com".to_string(),
                first_name: "María".to_string(),
                last_name: "González".to_string(),
            }),
        };

        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["orderNumber"], "ORD-1-ABC123XYZ");
        assert_eq!(json["customer"]["email"], "cliente@bellastore.com");
        assert_eq!(json["customer"]["firstName"], "María");
    }

    #[test]
    fn test_customer_view_omits_the_purchaser_field() {
        let view = OrderView {
            order: order(),
            items: vec![],
            address: None,
            customer: None,
        };

        let json = serde_json::to_value(&view).expect("serialize");
        assert!(json.get("customer").is_none());
    }
}
