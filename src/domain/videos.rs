//! Video queries

use sqlx::PgPool;

use crate::models::{NewVideo, Video, VideoUpdate};

pub async fn get_videos(db: &PgPool) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM videos ORDER BY created_at DESC")
        .fetch_all(db)
        .await
}

pub async fn get_video(db: &PgPool, id: i32) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create_video(db: &PgPool, video: &NewVideo) -> Result<Video, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO videos (title, description, script, trending_topic, trending_score, scheduled_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.script)
    .bind(&video.trending_topic)
    .bind(video.trending_score)
    .bind(video.scheduled_at)
    .fetch_one(db)
    .await
}

/// Apply a partial update; unset fields keep their current value.
pub async fn update_video(
    db: &PgPool,
    id: i32,
    updates: &VideoUpdate,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            script = COALESCE($4, script),
            status = COALESCE($5, status),
            youtube_id = COALESCE($6, youtube_id),
            thumbnail_url = COALESCE($7, thumbnail_url),
            drive_file_id = COALESCE($8, drive_file_id),
            duration = COALESCE($9, duration),
            views = COALESCE($10, views),
            likes = COALESCE($11, likes),
            published_at = COALESCE($12, published_at)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&updates.title)
    .bind(&updates.description)
    .bind(&updates.script)
    .bind(updates.status.map(|s| s.as_str()))
    .bind(&updates.youtube_id)
    .bind(&updates.thumbnail_url)
    .bind(&updates.drive_file_id)
    .bind(&updates.duration)
    .bind(updates.views)
    .bind(updates.likes)
    .bind(updates.published_at)
    .fetch_optional(db)
    .await
}

/// The pending video with the earliest scheduled time, if any.
pub async fn get_next_scheduled_video(db: &PgPool) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM videos
        WHERE status = 'pending' AND scheduled_at IS NOT NULL
        ORDER BY scheduled_at ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await
}
