//! HTTP JSON API consumed by the dashboard UI.

pub mod dashboard;
pub mod jobs;
pub mod manual;
pub mod schedules;
pub mod system;
pub mod topics;
pub mod videos;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Build all routes for the API
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(dashboard::routes())
        .merge(jobs::routes())
        .merge(manual::routes())
        .merge(schedules::routes())
        .merge(system::routes())
        .merge(topics::routes())
        .merge(videos::routes())
}
