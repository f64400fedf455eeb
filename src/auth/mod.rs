//! Authentication module

pub mod jwt;
pub mod service;

pub use jwt::{verify_token, Claims, TokenType};
pub use service::{AuthService, AuthTokensResponse, LoginRequest, RefreshTokenRequest};
