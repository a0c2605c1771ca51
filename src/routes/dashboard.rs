//! Dashboard endpoints (/api/dashboard/*)

use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::AppState;
use crate::domain::stats::{self, DashboardStats};
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard/stats", get(get_stats))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>, ApiError> {
    let stats = stats::get_dashboard_stats(&state.db)
        .await
        .log_500("Failed to fetch dashboard stats")?;
    Ok(Json(stats))
}
