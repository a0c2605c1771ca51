//! Schedule queries

use sqlx::PgPool;

use crate::models::{NewSchedule, Schedule};

pub async fn get_schedules(db: &PgPool) -> Result<Vec<Schedule>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM schedules ORDER BY name")
        .fetch_all(db)
        .await
}

pub async fn create_schedule(db: &PgPool, schedule: &NewSchedule) -> Result<Schedule, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO schedules (name, cron_expression, job_type, config)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&schedule.name)
    .bind(&schedule.cron_expression)
    .bind(&schedule.job_type)
    .bind(&schedule.config)
    .fetch_one(db)
    .await
}

pub async fn delete_schedule(db: &PgPool, name: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedules WHERE name = $1")
        .bind(name)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
