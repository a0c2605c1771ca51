//! Database access - one module per entity, free functions over `&PgPool`.

pub mod configs;
pub mod jobs;
pub mod schedules;
pub mod stats;
pub mod topics;
pub mod users;
pub mod videos;

use sqlx::PgPool;

/// Database reachability probe for the health endpoint.
pub async fn check_health(db: &PgPool) -> bool {
    sqlx::query("SELECT id FROM users LIMIT 1")
        .fetch_optional(db)
        .await
        .is_ok()
}
