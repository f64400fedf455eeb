//! User HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{ApiResponse, PaginatedResponse, UserResponse};
use crate::state::AppState;
use crate::users::{UpdateUserRequest, UserListQuery};

/// GET /api/users/me - The authenticated user's profile
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state.user_service.find_user_by_id(user.user_id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(profile))))
}

/// GET /api/users - Paginated user listing with optional search
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserResponse>>>, ApiError> {
    let users = state.user_service.get_all_users(query).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/:id - Fetch a single user
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.find_user_by_id(id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/:id - Update a profile; users may only update their own
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    if id != user.user_id {
        return Err(ApiError::Forbidden(
            "You can only update your own profile".to_string(),
        ));
    }
    req.validate()?;

    let updated = state.user_service.update_user(id, req).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(updated))))
}

/// DELETE /api/users/:id - Delete an account; users may only delete their own
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if id != user.user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own profile".to_string(),
        ));
    }

    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
