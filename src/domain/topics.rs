//! Trending topic queries

use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::models::{NewTrendingTopic, TrendingTopic};

pub async fn get_trending_topics(db: &PgPool) -> Result<Vec<TrendingTopic>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM trending_topics ORDER BY score DESC")
        .fetch_all(db)
        .await
}

pub async fn get_trending_topic(
    db: &PgPool,
    id: i32,
) -> Result<Option<TrendingTopic>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM trending_topics WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create_trending_topic(
    db: &PgPool,
    topic: &NewTrendingTopic,
) -> Result<TrendingTopic, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO trending_topics (title, description, source, url, score, category, keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&topic.title)
    .bind(&topic.description)
    .bind(&topic.source)
    .bind(&topic.url)
    .bind(topic.score)
    .bind(&topic.category)
    .bind(&topic.keywords)
    .fetch_one(db)
    .await
}

pub async fn mark_used(db: &PgPool, id: i32) -> Result<Option<TrendingTopic>, sqlx::Error> {
    sqlx::query_as("UPDATE trending_topics SET used = TRUE WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Topics not yet backing a video, best score first.
pub async fn get_unused_trending_topics(db: &PgPool) -> Result<Vec<TrendingTopic>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM trending_topics WHERE used = FALSE ORDER BY score DESC")
        .fetch_all(db)
        .await
}

pub async fn count_recent_trending_topics(db: &PgPool, hours: i64) -> Result<i64, sqlx::Error> {
    let cutoff = Utc::now() - Duration::hours(hours);
    sqlx::query_scalar("SELECT COUNT(*) FROM trending_topics WHERE analyzed_at >= $1")
        .bind(cutoff)
        .fetch_one(db)
        .await
}

/// Delete topics analyzed before the retention window; returns rows removed.
pub async fn delete_old_trending_topics(db: &PgPool, days: i64) -> Result<u64, sqlx::Error> {
    let cutoff = Utc::now() - Duration::days(days);
    let result = sqlx::query("DELETE FROM trending_topics WHERE analyzed_at <= $1")
        .bind(cutoff)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
