//! Automation job queries
//!
//! Status transitions are guarded in the UPDATE predicates: a job can only be
//! marked running from `pending` and only reach a terminal state from
//! `running`, so reverse transitions cannot be written.

use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::{AutomationJob, JobType};

pub async fn get_automation_jobs(db: &PgPool) -> Result<Vec<AutomationJob>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM automation_jobs ORDER BY created_at DESC")
        .fetch_all(db)
        .await
}

pub async fn create_job(
    db: &PgPool,
    job_type: JobType,
    video_id: Option<i32>,
    payload: Option<Value>,
) -> Result<AutomationJob, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO automation_jobs (type, video_id, payload)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(job_type.as_str())
    .bind(video_id)
    .bind(payload)
    .fetch_one(db)
    .await
}

/// pending -> running. Returns `None` if the job was not pending.
pub async fn mark_running(db: &PgPool, id: i32) -> Result<Option<AutomationJob>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE automation_jobs
        SET status = 'running', started_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// running -> completed. Returns `None` if the job was not running.
pub async fn complete_job(
    db: &PgPool,
    id: i32,
    result: &Value,
) -> Result<Option<AutomationJob>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE automation_jobs
        SET status = 'completed', result = $2, completed_at = NOW()
        WHERE id = $1 AND status = 'running'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(result)
    .fetch_optional(db)
    .await
}

/// running -> failed, recording the error message.
pub async fn fail_job(
    db: &PgPool,
    id: i32,
    error: &str,
) -> Result<Option<AutomationJob>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE automation_jobs
        SET status = 'failed', error = $2, completed_at = NOW()
        WHERE id = $1 AND status = 'running'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(error)
    .fetch_optional(db)
    .await
}

/// Running jobs, newest first, optionally restricted to one type.
pub async fn get_running_jobs(
    db: &PgPool,
    job_type: Option<JobType>,
) -> Result<Vec<AutomationJob>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM automation_jobs
        WHERE status = 'running' AND ($1::text IS NULL OR type = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(job_type.map(|t| t.as_str()))
    .fetch_all(db)
    .await
}

/// Delete completed jobs created before the retention window; returns rows removed.
pub async fn delete_old_completed_jobs(db: &PgPool, days: i64) -> Result<u64, sqlx::Error> {
    let cutoff = Utc::now() - Duration::days(days);
    let result =
        sqlx::query("DELETE FROM automation_jobs WHERE status = 'completed' AND created_at <= $1")
            .bind(cutoff)
            .execute(db)
            .await?;
    Ok(result.rows_affected())
}
