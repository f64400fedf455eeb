//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthService;
use crate::debts::{DebtService, ExportService};
use crate::users::UserService;

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub debt_service: Arc<DebtService>,
    pub export_service: Arc<ExportService>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        auth_service: Arc<AuthService>,
        debt_service: Arc<DebtService>,
        export_service: Arc<ExportService>,
    ) -> Self {
        Self {
            user_service,
            auth_service,
            debt_service,
            export_service,
        }
    }
}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.user_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<DebtService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.debt_service.clone()
    }
}

impl FromRef<AppState> for Arc<ExportService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.export_service.clone()
    }
}
