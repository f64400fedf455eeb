//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use super::AuthenticatedUser;
use crate::auth::{AuthTokensResponse, LoginRequest, RefreshTokenRequest};
use crate::error::ApiError;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::users::CreateUserRequest;

/// POST /api/auth/register - Create an account and issue tokens
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthTokensResponse>>), ApiError> {
    req.validate()?;

    let tokens = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tokens))))
}

/// POST /api/auth/login - Authenticate with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthTokensResponse>>, ApiError> {
    let tokens = state.auth_service.login(req).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/refresh - Exchange a refresh token for a new pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<AuthTokensResponse>>, ApiError> {
    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/logout - Invalidate the stored refresh token
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.auth_service.logout(user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
