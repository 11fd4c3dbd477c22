use crate::models::Comment;
use sqlx::{PgExecutor, PgPool};

/// Inserts a comment and reads the joined row back inside one transaction.
pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let comment_id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(&mut *tx)
    .await?;

    let comment = fetch_comment(&mut *tx, comment_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    tx.commit().await?;
    Ok(comment)
}

/// Fetches all comments of a post, newest first, ties broken by insertion
/// order.
pub async fn list_for_post(pool: &PgPool, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.post_id, c.text, c.created_at,
               c.author_id, u.username AS author_username
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

async fn fetch_comment<'e, E>(executor: E, comment_id: i64) -> Result<Option<Comment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.post_id, c.text, c.created_at,
               c.author_id, u.username AS author_username
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(executor)
    .await
}
