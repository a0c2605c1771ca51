//! Schedule endpoints (/api/schedules)

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde_json::Value;
use std::sync::Arc;

use crate::AppState;
use crate::domain::schedules;
use crate::models::{NewSchedule, Schedule};
use crate::services::error::{ApiError, LogErr};
use crate::services::scheduler::SchedulerError;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/schedules", get(list_schedules).post(create_schedule))
        .route("/api/schedules/{name}", delete(remove_schedule))
}

async fn list_schedules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let schedules = schedules::get_schedules(&state.db)
        .await
        .log_500("Failed to fetch schedules")?;
    Ok(Json(schedules))
}

async fn create_schedule(
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("Request body is required"))?;
    let new_schedule: NewSchedule = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid schedule payload: {}", e)))?;

    let schedule = state
        .scheduler
        .add_schedule(&new_schedule)
        .await
        .map_err(|e| match e {
            SchedulerError::InvalidCron(_) | SchedulerError::UnknownJobType(_) => {
                ApiError::bad_request(e.to_string())
            }
            SchedulerError::Database(db_err) => {
                tracing::error!("Failed to create schedule: {}", db_err);
                ApiError::internal("Failed to create schedule")
            }
        })?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn remove_schedule(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .scheduler
        .remove_schedule(&name)
        .await
        .log_500("Failed to remove schedule")?;

    if !removed {
        return Err(ApiError::not_found("Schedule not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
