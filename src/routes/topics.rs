//! Trending topic endpoints (/api/trending-topics)

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use crate::domain::topics;
use crate::models::TrendingTopic;
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trending-topics", get(list_topics))
        .route("/api/trending-topics/analyze", post(analyze_topics))
}

async fn list_topics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrendingTopic>>, ApiError> {
    let topics = topics::get_trending_topics(&state.db)
        .await
        .log_500("Failed to fetch trending topics")?;
    Ok(Json(topics))
}

/// Run an analysis pass inline and persist whatever comes back.
async fn analyze_topics(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let found = state
        .services
        .gemini
        .analyze_trending_news()
        .await
        .log_500("Failed to analyze trending topics")?;

    for topic in &found {
        if let Err(e) = topics::create_trending_topic(&state.db, topic).await {
            warn!("Failed to save topic '{}': {}", topic.title, e);
        }
    }

    Ok(Json(json!({
        "message": "Trending topics analyzed successfully",
        "count": found.len(),
    })))
}
