//! Per-service API configuration queries

use serde_json::Value;
use sqlx::PgPool;

use crate::models::ApiConfiguration;

pub async fn get_api_configuration(
    db: &PgPool,
    service: &str,
) -> Result<Option<ApiConfiguration>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM api_configurations WHERE service = $1")
        .bind(service)
        .fetch_optional(db)
        .await
}

pub async fn upsert_api_configuration(
    db: &PgPool,
    service: &str,
    api_key: Option<&str>,
    config: Option<&Value>,
) -> Result<ApiConfiguration, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO api_configurations (service, api_key, config)
        VALUES ($1, $2, $3)
        ON CONFLICT (service) DO UPDATE SET
            api_key = COALESCE($2, api_configurations.api_key),
            config = COALESCE($3, api_configurations.config)
        RETURNING *
        "#,
    )
    .bind(service)
    .bind(api_key)
    .bind(config)
    .fetch_one(db)
    .await
}

/// Stamp a service configuration after a successful vendor call.
pub async fn touch_last_used(db: &PgPool, service: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE api_configurations SET last_used = NOW() WHERE service = $1")
        .bind(service)
        .execute(db)
        .await?;
    Ok(())
}
