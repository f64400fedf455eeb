//! Dutch Backend Library
//!
//! This library exports the core modules for the Dutch debt-tracking server.

pub mod auth;
pub mod cache;
pub mod config;
pub mod debts;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod users;
