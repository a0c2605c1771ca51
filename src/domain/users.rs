//! User queries

use sqlx::PgPool;

use crate::models::User;

pub async fn get_user(db: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn get_user_by_username(
    db: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(db)
        .await
}

pub async fn create_user(db: &PgPool, username: &str, password: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(password)
    .fetch_one(db)
    .await
}
