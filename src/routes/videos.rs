//! Video endpoints (/api/videos)

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;

use crate::AppState;
use crate::domain::videos;
use crate::models::{NewVideo, Video};
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/videos", get(list_videos).post(create_video))
        .route("/api/videos/{id}", get(get_video))
}

async fn list_videos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Video>>, ApiError> {
    let videos = videos::get_videos(&state.db)
        .await
        .log_500("Failed to fetch videos")?;
    Ok(Json(videos))
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Video>, ApiError> {
    let video = videos::get_video(&state.db, id)
        .await
        .log_500("Failed to fetch video")?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;
    Ok(Json(video))
}

async fn create_video(
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("Request body is required"))?;
    let new_video: NewVideo = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid video payload: {}", e)))?;
    if new_video.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let video = videos::create_video(&state.db, &new_video)
        .await
        .log_500("Failed to create video")?;
    Ok((StatusCode::CREATED, Json(video)))
}
