use crate::feed::FeedFilter;
use crate::models::Post;
use sqlx::{PgExecutor, PgPool};

/// Inserts a new post and reads the joined row back inside one transaction,
/// so a post and its author/group references are never observed half-applied.
pub async fn create_post(
    pool: &PgPool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let post_id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO posts (author_id, text, group_id, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(text)
    .bind(group_id)
    .bind(image)
    .fetch_one(&mut *tx)
    .await?;

    let post = fetch_post(&mut *tx, post_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    tx.commit().await?;
    Ok(post)
}

/// Fetches a single post by its ID.
pub async fn get_post(pool: &PgPool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    fetch_post(pool, post_id).await
}

/// Updates a post's editable fields. `created_at` is never touched.
/// Returns `None` when the post does not exist.
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let updated: Option<i64> = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE posts
        SET text = $2, group_id = $3, image = $4
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(text)
    .bind(group_id)
    .bind(image)
    .fetch_optional(&mut *tx)
    .await?;

    let post = match updated {
        Some(id) => fetch_post(&mut *tx, id).await?,
        None => None,
    };
    tx.commit().await?;
    Ok(post)
}

/// Fetches one page of posts matching the filter, most recent first, ties
/// broken by insertion order.
pub async fn list_posts(
    pool: &PgPool,
    filter: &FeedFilter,
    limit: u64,
    offset: u64,
) -> Result<Vec<Post>, sqlx::Error> {
    let limit = limit as i64;
    let offset = offset as i64;
    match filter {
        FeedFilter::All => {
            sqlx::query_as::<_, Post>(
                r#"
                SELECT p.id, p.text, p.created_at, p.image,
                       p.author_id, u.username AS author_username,
                       p.group_id, g.slug AS group_slug, g.title AS group_title
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                ORDER BY p.created_at DESC, p.id ASC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        FeedFilter::Group(group_id) => {
            sqlx::query_as::<_, Post>(
                r#"
                SELECT p.id, p.text, p.created_at, p.image,
                       p.author_id, u.username AS author_username,
                       p.group_id, g.slug AS group_slug, g.title AS group_title
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                WHERE p.group_id = $1
                ORDER BY p.created_at DESC, p.id ASC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(group_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        FeedFilter::Author(author_id) => {
            sqlx::query_as::<_, Post>(
                r#"
                SELECT p.id, p.text, p.created_at, p.image,
                       p.author_id, u.username AS author_username,
                       p.group_id, g.slug AS group_slug, g.title AS group_title
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                WHERE p.author_id = $1
                ORDER BY p.created_at DESC, p.id ASC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        FeedFilter::Following(follower_id) => {
            sqlx::query_as::<_, Post>(
                r#"
                SELECT p.id, p.text, p.created_at, p.image,
                       p.author_id, u.username AS author_username,
                       p.group_id, g.slug AS group_slug, g.title AS group_title
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                WHERE p.author_id IN (
                    SELECT f.author_id FROM follows f WHERE f.follower_id = $1
                )
                ORDER BY p.created_at DESC, p.id ASC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(follower_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

/// Counts the posts matching the filter, independent of pagination.
pub async fn count_posts(pool: &PgPool, filter: &FeedFilter) -> Result<i64, sqlx::Error> {
    match filter {
        FeedFilter::All => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
                .fetch_one(pool)
                .await
        }
        FeedFilter::Group(group_id) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(pool)
                .await
        }
        FeedFilter::Author(author_id) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
                .bind(author_id)
                .fetch_one(pool)
                .await
        }
        FeedFilter::Following(follower_id) => {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM posts
                WHERE author_id IN (
                    SELECT f.author_id FROM follows f WHERE f.follower_id = $1
                )
                "#,
            )
            .bind(follower_id)
            .fetch_one(pool)
            .await
        }
    }
}

async fn fetch_post<'e, E>(executor: E, post_id: i64) -> Result<Option<Post>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.text, p.created_at, p.image,
               p.author_id, u.username AS author_username,
               p.group_id, g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(executor)
    .await
}
