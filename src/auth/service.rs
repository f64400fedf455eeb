//! Authentication service
//!
//! Registration, login, token refresh, and logout. Issues an access/refresh
//! token pair and persists the latest refresh token on the user record;
//! issuing a new pair implicitly invalidates any previous one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::User;
use crate::users::{CreateUserRequest, UserService};

use super::jwt::{
    generate_access_token, generate_refresh_token, get_user_id_from_claims, verify_token,
    TokenType,
};

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// User projection embedded in auth responses
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

/// Token pair response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

#[derive(Clone)]
pub struct AuthService {
    user_service: UserService,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        user_service: UserService,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_days: i64,
    ) -> Self {
        Self {
            user_service,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
        }
    }

    /// Register a new user and issue a token pair
    pub async fn register(&self, request: CreateUserRequest) -> Result<AuthTokensResponse, ApiError> {
        tracing::info!(email = %request.email, "Registering user");

        let user = self.user_service.create_user(request).await?;
        let response = self.issue_tokens(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(response)
    }

    /// Authenticate with email and password
    pub async fn login(&self, request: LoginRequest) -> Result<AuthTokensResponse, ApiError> {
        tracing::info!(email = %request.email, "Login attempt");

        let user = self
            .user_service
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(email = %request.email, "Login failed - user not found");
                ApiError::Unauthorized("Invalid credentials".to_string())
            })?;

        if !user.is_active {
            tracing::warn!(email = %request.email, "Login failed - inactive account");
            return Err(ApiError::Unauthorized("Account is inactive".to_string()));
        }

        let password_ok = bcrypt::verify(&request.password, &user.password)
            .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;
        if !password_ok {
            tracing::warn!(email = %request.email, "Login failed - wrong password");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        let response = self.issue_tokens(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(response)
    }

    /// Exchange a valid refresh token for a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokensResponse, ApiError> {
        tracing::info!("Refreshing access token");

        let claims = verify_token(refresh_token, &self.jwt_secret)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        if claims.token_type != TokenType::Refresh.as_str() {
            return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
        }

        let user_id = get_user_id_from_claims(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        let user = self.user_service.find_user_by_id(user_id).await?;

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Token refresh failed - inactive account");
            return Err(ApiError::Unauthorized("Account is inactive".to_string()));
        }

        let response = self.issue_tokens(&user).await?;

        tracing::info!(user_id = %user.id, "Access token refreshed");
        Ok(response)
    }

    /// Clear the stored refresh token
    pub async fn logout(&self, user_id: Uuid) -> Result<(), ApiError> {
        tracing::info!(user_id = %user_id, "Logging out user");
        self.user_service.remove_refresh_token(user_id).await?;
        Ok(())
    }

    /// Generate a token pair and persist the refresh token on the user
    async fn issue_tokens(&self, user: &User) -> Result<AuthTokensResponse, ApiError> {
        let access_token =
            generate_access_token(user, &self.jwt_secret, self.access_token_ttl_seconds)
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let refresh_token =
            generate_refresh_token(user, &self.jwt_secret, self.refresh_token_ttl_days)
                .map_err(|e| ApiError::InternalError(e.to_string()))?;

        self.user_service
            .update_refresh_token(user.id, &refresh_token)
            .await?;

        Ok(AuthTokensResponse {
            access_token,
            refresh_token,
            expires_in: self.access_token_ttl_seconds,
            user: AuthUser {
                id: user.id,
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                is_active: user.is_active,
            },
        })
    }

    /// JWT secret (for the auth extractor)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
