//! Domain models for the storefront.
//!
//! Models double as database row types (`sqlx::FromRow`) and JSON response
//! types (`serde::Serialize`, camelCase like the rest of the API).

pub mod address;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use address::Address;
pub use cart::{CartItem, CartItemWithProduct, CartLine, CartSummary, CartView};
pub use category::{Category, CategorySummary, CategoryWithCount};
pub use order::{CustomerSummary, Order, OrderItemView, OrderView};
pub use product::{Product, ProductWithCategory};
pub use session::{CurrentUser, session_keys};
pub use user::User;
