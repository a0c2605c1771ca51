//! Automation task execution.
//!
//! Every run - scheduled or manually triggered - goes through
//! [`execute_job`], which drives the owning AutomationJob row through
//! running -> completed | failed and records errors on it.

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::error::ServiceError;
use super::{Services, UploadMetadata};
use crate::constants::{self, YOUTUBE_NEWS_CATEGORY};
use crate::domain::{configs, jobs, topics, videos};
use crate::models::{JobType, NewVideo, TrendingTopic, Video, VideoStatus, VideoUpdate};

/// Create a job row for a scheduler fire and execute it.
pub async fn run_scheduled(services: &Services, job_type: JobType) {
    let payload = json!({ "scheduled": true, "timestamp": Utc::now().to_rfc3339() });
    match jobs::create_job(&services.db, job_type, None, Some(payload)).await {
        Ok(job) => execute_job(services, job.id, job_type, None, None).await,
        Err(e) => error!("Failed to create {} job: {}", job_type.as_str(), e),
    }
}

/// Drive one automation job from pending through to a terminal state.
pub async fn execute_job(
    services: &Services,
    job_id: i32,
    job_type: JobType,
    video_id: Option<i32>,
    topic_id: Option<i32>,
) {
    match jobs::mark_running(&services.db, job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Job {} was not pending, skipping", job_id);
            return;
        }
        Err(e) => {
            error!("Failed to mark job {} running: {}", job_id, e);
            return;
        }
    }

    let result = match job_type {
        JobType::NewsAnalysis => news_analysis_task(services).await,
        JobType::VideoCreation => video_creation_task(services, video_id, topic_id).await,
        JobType::Cleanup => cleanup_task(services).await,
    };

    match result {
        Ok(outcome) => {
            if let Err(e) = jobs::complete_job(&services.db, job_id, &outcome).await {
                error!("Failed to complete job {}: {}", job_id, e);
            }
        }
        Err(e) => {
            error!("Job {} ({}) failed: {}", job_id, job_type.as_str(), e);
            if let Err(db_err) = jobs::fail_job(&services.db, job_id, &e.to_string()).await {
                error!("Failed to record failure for job {}: {}", job_id, db_err);
            }
        }
    }
}

/// Analyze trending news and persist whatever topics come back.
async fn news_analysis_task(services: &Services) -> Result<Value, ServiceError> {
    info!("Starting news analysis...");

    let found = services.gemini.analyze_trending_news().await?;

    let mut saved = 0usize;
    for topic in &found {
        match topics::create_trending_topic(&services.db, topic).await {
            Ok(_) => saved += 1,
            Err(e) => warn!("Failed to save topic '{}': {}", topic.title, e),
        }
    }

    if let Err(e) = configs::touch_last_used(&services.db, "gemini").await {
        warn!("Failed to update gemini last_used: {}", e);
    }

    info!("News analysis completed: {} topics saved", saved);
    Ok(json!({ "topicsAnalyzed": found.len(), "topicsSaved": saved }))
}

/// Produce and publish one video. With no explicit video/topic, the best
/// unused trending topic backs a freshly created record.
async fn video_creation_task(
    services: &Services,
    video_id: Option<i32>,
    topic_id: Option<i32>,
) -> Result<Value, ServiceError> {
    let db = &services.db;

    let (video, topic) = match (video_id, topic_id) {
        (Some(vid), Some(tid)) => {
            let video = videos::get_video(db, vid)
                .await?
                .ok_or_else(|| ServiceError::Api(format!("Video {} not found", vid)))?;
            let topic = topics::get_trending_topic(db, tid)
                .await?
                .ok_or_else(|| ServiceError::Api(format!("Topic {} not found", tid)))?;
            (video, topic)
        }
        _ => {
            let mut unused = topics::get_unused_trending_topics(db).await?;
            if unused.is_empty() {
                return Err(ServiceError::Api("No trending topics available".to_string()));
            }
            let topic = unused.remove(0);
            let video = videos::create_video(
                db,
                &NewVideo {
                    title: format!("Breaking: {}", topic.title),
                    trending_topic: Some(topic.title.clone()),
                    trending_score: Some(topic.score),
                    scheduled_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;
            (video, topic)
        }
    };

    match produce_and_publish(services, &video, &topic).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            let failed = VideoUpdate {
                status: Some(VideoStatus::Failed),
                ..Default::default()
            };
            if let Err(db_err) = videos::update_video(db, video.id, &failed).await {
                error!("Failed to mark video {} failed: {}", video.id, db_err);
            }
            Err(e)
        }
    }
}

async fn produce_and_publish(
    services: &Services,
    video: &Video,
    topic: &TrendingTopic,
) -> Result<Value, ServiceError> {
    let db = &services.db;

    videos::update_video(
        db,
        video.id,
        &VideoUpdate {
            status: Some(VideoStatus::Processing),
            ..Default::default()
        },
    )
    .await?;

    let output = services.creator.create_video(video, topic).await?;

    videos::update_video(
        db,
        video.id,
        &VideoUpdate {
            script: Some(output.script.clone()),
            description: Some(output.description.clone()),
            duration: Some(output.duration.clone()),
            drive_file_id: Some(output.drive_video_file_id.clone()),
            status: Some(VideoStatus::Completed),
            ..Default::default()
        },
    )
    .await?;

    let metadata = UploadMetadata {
        title: video.title.clone(),
        description: output.description.clone(),
        tags: topic.keywords.clone(),
        category_id: YOUTUBE_NEWS_CATEGORY.to_string(),
        privacy_status: "public".to_string(),
    };
    let youtube_id = services
        .youtube
        .upload_video(&output.video_path, &metadata)
        .await?;
    services
        .youtube
        .set_thumbnail(&youtube_id, &output.thumbnail_path)
        .await?;

    videos::update_video(
        db,
        video.id,
        &VideoUpdate {
            youtube_id: Some(youtube_id.clone()),
            status: Some(VideoStatus::Published),
            published_at: Some(Utc::now()),
            ..Default::default()
        },
    )
    .await?;

    topics::mark_used(db, topic.id).await?;

    services
        .creator
        .cleanup(&[output.video_path.clone(), output.thumbnail_path.clone()])
        .await;

    info!("Video creation completed: {}", youtube_id);
    Ok(json!({ "videoId": video.id, "youtubeId": youtube_id }))
}

/// Retention sweep over analyzed topics and completed jobs.
async fn cleanup_task(services: &Services) -> Result<Value, ServiceError> {
    info!("Starting cleanup...");

    let topics_deleted =
        topics::delete_old_trending_topics(&services.db, constants::topic_retention_days()).await?;
    let jobs_deleted =
        jobs::delete_old_completed_jobs(&services.db, constants::job_retention_days()).await?;

    info!(
        "Cleanup completed: {} topics, {} jobs deleted",
        topics_deleted, jobs_deleted
    );
    Ok(json!({ "topicsDeleted": topics_deleted, "jobsDeleted": jobs_deleted }))
}
