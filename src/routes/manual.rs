//! Manual trigger endpoints (/api/manual/*)
//!
//! Each trigger creates the AutomationJob row up front, detaches the actual
//! run, and responds immediately with the job id; completion is observable
//! through /api/automation-jobs.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::AppState;
use crate::domain::{configs, jobs, topics, videos};
use crate::models::{JobType, NewVideo};
use crate::services::VoiceOptions;
use crate::services::automation;
use crate::services::error::{ApiError, LogErr};

const DEFAULT_TEST_TEXT: &str =
    "Hello, this is a test of the Indian English text-to-speech voice.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/manual/news-analysis", post(trigger_news_analysis))
        .route("/api/manual/create-video", post(trigger_create_video))
        .route("/api/manual/test-tts", post(test_tts))
}

async fn trigger_news_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let job = jobs::create_job(
        &state.db,
        JobType::NewsAnalysis,
        None,
        Some(json!({ "manual": true })),
    )
    .await
    .log_500("Failed to start news analysis")?;

    let services = state.services.clone();
    let job_id = job.id;
    tokio::spawn(async move {
        automation::execute_job(&services, job_id, JobType::NewsAnalysis, None, None).await;
    });

    Ok(Json(json!({
        "message": "News analysis started",
        "jobId": job.id,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateVideoRequest {
    topic_id: Option<i32>,
}

async fn trigger_create_video(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateVideoRequest>>,
) -> Result<Json<Value>, ApiError> {
    let topic_id = body
        .and_then(|Json(b)| b.topic_id)
        .ok_or_else(|| ApiError::bad_request("Topic ID is required"))?;

    let topic = topics::get_trending_topic(&state.db, topic_id)
        .await
        .log_500("Failed to fetch topic")?
        .ok_or_else(|| ApiError::not_found("Topic not found"))?;

    let video = videos::create_video(
        &state.db,
        &NewVideo {
            title: format!("Breaking: {}", topic.title),
            trending_topic: Some(topic.title.clone()),
            trending_score: Some(topic.score),
            scheduled_at: Some(Utc::now()),
            ..Default::default()
        },
    )
    .await
    .log_500("Failed to create video")?;

    let job = jobs::create_job(
        &state.db,
        JobType::VideoCreation,
        Some(video.id),
        Some(json!({ "topicId": topic.id, "manual": true })),
    )
    .await
    .log_500("Failed to create automation job")?;

    let services = state.services.clone();
    let (job_id, video_id) = (job.id, video.id);
    tokio::spawn(async move {
        automation::execute_job(
            &services,
            job_id,
            JobType::VideoCreation,
            Some(video_id),
            Some(topic_id),
        )
        .await;
    });

    Ok(Json(json!({
        "message": "Video creation started",
        "videoId": video.id,
        "jobId": job.id,
    })))
}

#[derive(Debug, Deserialize)]
struct TestTtsRequest {
    text: Option<String>,
}

async fn test_tts(
    State(state): State<Arc<AppState>>,
    body: Option<Json<TestTtsRequest>>,
) -> Result<Json<Value>, ApiError> {
    let text = body
        .and_then(|Json(b)| b.text)
        .unwrap_or_else(|| DEFAULT_TEST_TEXT.to_string());

    // Voice parameters come from the persisted TTS configuration when present.
    let options = match configs::get_api_configuration(&state.db, "tts").await {
        Ok(Some(cfg)) => voice_options_from_config(cfg.config.as_ref()),
        _ => VoiceOptions::default(),
    };

    let audio_path = state
        .services
        .tts
        .synthesize(&text, &options)
        .await
        .log_500("Failed to test TTS")?;

    let _ = configs::touch_last_used(&state.db, "tts").await;

    Ok(Json(json!({
        "message": "TTS test completed",
        "audioUrl": audio_path.display().to_string(),
    })))
}

fn voice_options_from_config(config: Option<&Value>) -> VoiceOptions {
    let mut options = VoiceOptions::default();
    if let Some(cfg) = config {
        if let Some(v) = cfg.get("voice").and_then(Value::as_str) {
            options.voice = v.to_string();
        }
        if let Some(v) = cfg.get("languageCode").and_then(Value::as_str) {
            options.language_code = v.to_string();
        }
        if let Some(v) = cfg.get("speakingRate").and_then(Value::as_f64) {
            options.speaking_rate = v;
        }
        if let Some(v) = cfg.get("pitch").and_then(Value::as_f64) {
            options.pitch = v;
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_options_fall_back_to_defaults() {
        let options = voice_options_from_config(None);
        assert_eq!(options.voice, "en-IN-Standard-A");
        assert_eq!(options.speaking_rate, 1.0);
    }

    #[test]
    fn voice_options_read_configured_fields() {
        let cfg = json!({
            "voice": "en-IN-Standard-D",
            "languageCode": "en-IN",
            "speakingRate": 0.9,
            "pitch": -2.0,
        });
        let options = voice_options_from_config(Some(&cfg));
        assert_eq!(options.voice, "en-IN-Standard-D");
        assert_eq!(options.speaking_rate, 0.9);
        assert_eq!(options.pitch, -2.0);
    }
}
