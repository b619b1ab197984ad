//! `BellaStore` storefront library.
//!
//! The storefront and back-office JSON API as a library, so the binary stays
//! thin and the pieces can be exercised from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
