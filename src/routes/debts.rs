//! Debt route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::debts;
use crate::state::AppState;

pub fn debt_routes() -> Router<AppState> {
    Router::new()
        // Fixed paths are registered before /api/debts/:id so they never
        // get captured as an id
        .route("/api/debts/dashboard/summary", get(debts::dashboard_summary))
        .route("/api/debts/export/stats", get(debts::export_stats))
        .route("/api/debts/export", post(debts::export_debts))
        .route(
            "/api/debts",
            post(debts::create_debt).get(debts::list_debts),
        )
        .route(
            "/api/debts/:id",
            get(debts::get_debt)
                .put(debts::update_debt)
                .delete(debts::delete_debt),
        )
        .route("/api/debts/:id/mark-as-paid", put(debts::mark_as_paid))
}
