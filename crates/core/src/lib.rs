//! BellaStore Core - Shared domain types.
//!
//! This crate provides common types used across all BellaStore components:
//! - `storefront` - Public storefront and back-office JSON API
//! - `cli` - Command-line tools for migrations, seeding, and imports
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
