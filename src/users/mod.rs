//! User directory module

pub mod model;
pub mod service;

pub use model::{CreateUserRequest, UpdateUserRequest, UserListQuery};
pub use service::UserService;
