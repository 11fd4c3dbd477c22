use crate::models::Group;
use sqlx::PgPool;

/// Inserts a new group. Slug uniqueness is enforced by the storage layer;
/// use [`is_slug_conflict`] to recognize the violation.
pub async fn create_group(
    pool: &PgPool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (title, slug, description)
        VALUES ($1, $2, $3)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Resolves a group by its slug, the external key used in URLs.
pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub fn is_slug_conflict(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("groups_slug_key"))
}
