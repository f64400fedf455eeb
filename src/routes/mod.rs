//! Route definitions

pub mod auth;
pub mod debts;
pub mod users;

pub use auth::auth_routes;
pub use debts::debt_routes;
pub use users::user_routes;
