use crate::models::User;
use sqlx::PgPool;

/// Creates the row for an externally-authenticated username, or refreshes its
/// display name when the identity layer supplies one.
pub async fn upsert_user(
    pool: &PgPool,
    username: &str,
    display_name: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, display_name)
        VALUES ($1, COALESCE($2, ''))
        ON CONFLICT (username)
        DO UPDATE SET display_name = COALESCE($2, users.display_name)
        RETURNING id, username, display_name, created_at
        "#,
    )
    .bind(username)
    .bind(display_name)
    .fetch_one(pool)
    .await
}

/// Fetches a user by username.
pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, display_name, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}
