// HTTP request handlers
use crate::infrastructure::dashboard_view::DashboardSnapshot;
use crate::presentation::app_state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current rendered state of the dashboard page
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.view.snapshot())
}
