use sqlx::PgPool;

/// Inserts the follow edge unless it already exists. The composite unique
/// constraint makes concurrent duplicate inserts race-safe; the conflict is
/// swallowed rather than surfaced.
pub async fn insert(pool: &PgPool, follower_id: i64, author_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, author_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Deletes the follow edge if present. Returns the number of rows removed.
pub async fn delete(pool: &PgPool, follower_id: i64, author_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND author_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn exists(pool: &PgPool, follower_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await
}
