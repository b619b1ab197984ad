//! Product catalog models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bella_store_core::{CategoryId, Price, ProductId};

use super::category::CategorySummary;

/// A catalog product.
///
/// `price` is a minor-currency integer and `stock` is kept non-negative by
/// the database; stock is decremented only inside the checkout transaction.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock: i32,
    pub images: Vec<String>,
    pub material: Option<String>,
    pub category_id: CategoryId,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the requested quantity can currently be fulfilled.
    #[must_use]
    pub const fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}

/// A product with its category summary attached, as returned by catalog
/// listings and detail pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: CategorySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Bolso Tote Elegante".to_owned(),
            slug: "bolso-tote-elegante".to_owned(),
            description: String::new(),
            price: Price::new(89_900),
            stock,
            images: vec![],
            material: None,
            category_id: CategoryId::new(1),
            is_featured: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_stock_for() {
        assert!(product(5).has_stock_for(5));
        assert!(!product(5).has_stock_for(6));
        assert!(!product(0).has_stock_for(1));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(product(3)).expect("serialize");
        assert!(json.get("categoryId").is_some());
        assert!(json.get("isActive").is_some());
        assert_eq!(json["price"], 89_900);
    }
}
