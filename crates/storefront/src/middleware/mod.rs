//! Request middleware: sessions and the auth extractors built on them.

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth};
pub use session::create_session_layer;
