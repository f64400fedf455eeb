//! Debt HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::AuthenticatedUser;
use crate::debts::{CreateDebtRequest, DebtQuery, ExportRequest, ExportStats, UpdateDebtRequest};
use crate::error::ApiError;
use crate::models::{ApiResponse, DashboardSummary, DebtResponse, PaginatedResponse};
use crate::state::AppState;

/// POST /api/debts - Record a new debt with the caller as creditor
pub async fn create_debt(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateDebtRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DebtResponse>>), ApiError> {
    req.validate()?;

    let debt = state.debt_service.create_debt(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(debt))))
}

/// GET /api/debts - Filtered, sorted, paginated listing of visible debts
pub async fn list_debts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DebtQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<DebtResponse>>>, ApiError> {
    let debts = state.debt_service.get_all_debts(user.user_id, query).await?;
    Ok(Json(ApiResponse::ok(debts)))
}

/// GET /api/debts/:id - Fetch a single debt the caller is party to
pub async fn get_debt(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DebtResponse>>, ApiError> {
    let debt = state.debt_service.get_debt_by_id(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(debt)))
}

/// PUT /api/debts/:id - Update a debt as its creditor
pub async fn update_debt(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDebtRequest>,
) -> Result<Json<ApiResponse<DebtResponse>>, ApiError> {
    req.validate()?;

    let debt = state
        .debt_service
        .update_debt(user.user_id, id, req)
        .await?;
    Ok(Json(ApiResponse::ok(debt)))
}

/// PUT /api/debts/:id/mark-as-paid - Settle a debt as its creditor
pub async fn mark_as_paid(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DebtResponse>>, ApiError> {
    let debt = state.debt_service.mark_as_paid(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(debt)))
}

/// DELETE /api/debts/:id - Delete an unpaid debt as its creditor
pub async fn delete_debt(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.debt_service.delete_debt(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/debts/dashboard/summary - Cached per-user dashboard aggregate
pub async fn dashboard_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let summary = state.debt_service.get_dashboard_summary(user.user_id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/debts/export/stats - Export capabilities and visible debt count
pub async fn export_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ExportStats>>, ApiError> {
    let stats = state.export_service.get_export_stats(user.user_id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// POST /api/debts/export - Generate and download an export file
pub async fn export_debts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let export = state.export_service.export_debts(user.user_id, req).await?;

    let bytes = match tokio::fs::read(&export.file_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // The temp file must not outlive a failed download
            state.export_service.cleanup_temp_file(&export).await;
            return Err(ApiError::InternalError(format!(
                "Failed to read export file: {}",
                e
            )));
        }
    };

    state.export_service.cleanup_temp_file(&export).await;

    let headers = [
        (header::CONTENT_TYPE, export.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];

    Ok((headers, bytes).into_response())
}
