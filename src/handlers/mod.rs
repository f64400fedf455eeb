//! HTTP handlers

pub mod auth;
pub mod debts;
pub mod users;

pub use crate::middleware::AuthenticatedUser;
