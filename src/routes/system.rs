//! System health and pipeline status endpoints (/api/system/*, /api/pipeline/*)

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::AppState;
use crate::domain;
use crate::domain::{jobs, videos};
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/system/health", get(system_health))
        .route("/api/pipeline/status", get(pipeline_status))
}

/// Per-adapter health probes plus database reachability and the scheduler flag.
async fn system_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let services = &state.services;
    let (gemini, youtube, drive, tts) = tokio::join!(
        services.gemini.check_health(),
        services.youtube.check_health(),
        services.drive.check_health(),
        services.tts.check_health(),
    );
    let database = domain::check_health(&state.db).await;

    Json(json!({
        "database": database,
        "gemini": gemini,
        "youtube": youtube,
        "drive": drive,
        "tts": tts,
        "scheduler": state.scheduler.is_running(),
    }))
}

async fn pipeline_status(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let current_jobs = jobs::get_running_jobs(&state.db, None)
        .await
        .log_500("Failed to fetch pipeline status")?;
    let next_scheduled = videos::get_next_scheduled_video(&state.db)
        .await
        .log_500("Failed to fetch pipeline status")?;

    Ok(Json(json!({
        "currentJobs": current_jobs,
        "nextScheduled": next_scheduled,
        "isActive": state.scheduler.is_running(),
    })))
}
