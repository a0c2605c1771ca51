//! Automation job endpoints (/api/automation-jobs)

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::AppState;
use crate::domain::jobs;
use crate::models::{AutomationJob, JobType};
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/automation-jobs", get(list_jobs).post(create_job))
}

async fn list_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AutomationJob>>, ApiError> {
    let jobs = jobs::get_automation_jobs(&state.db)
        .await
        .log_500("Failed to fetch automation jobs")?;
    Ok(Json(jobs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobRequest {
    #[serde(rename = "type")]
    job_type: String,
    video_id: Option<i32>,
    payload: Option<Value>,
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<AutomationJob>), ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("Request body is required"))?;
    let request: CreateJobRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid job payload: {}", e)))?;
    let job_type = JobType::parse(&request.job_type)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown job type: {}", request.job_type)))?;

    let job = jobs::create_job(&state.db, job_type, request.video_id, request.payload)
        .await
        .log_500("Failed to create automation job")?;
    Ok((StatusCode::CREATED, Json(job)))
}
