//! HTTP middleware

pub mod auth;
pub mod tracing;

pub use auth::AuthenticatedUser;
pub use tracing::request_tracing;
