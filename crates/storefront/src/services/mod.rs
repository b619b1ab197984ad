//! Business logic that spans repositories.
//!
//! Single-aggregate reads and writes go straight from route handlers to the
//! repositories in [`crate::db`]; anything transactional or policy-bearing
//! lives here.

pub mod auth;
pub mod checkout;
