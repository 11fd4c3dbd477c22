use crate::error::AppError;
use crate::models::{Comment, Post, User};
use crate::repositories::{comment_repository, group_repository, post_repository};
use serde::Deserialize;
use sqlx::PgPool;

/// Form payload for creating or editing a post. The author never comes from
/// the payload — it is always the acting user.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Form payload for adding a comment.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub text: String,
}

/// Validates and persists a new post for `author`.
pub async fn create_post(pool: &PgPool, author: &User, input: &PostInput) -> Result<Post, AppError> {
    let text = non_empty_text(&input.text, "post text must not be empty")?;
    let group_id = resolve_group(pool, input.group.as_deref()).await?;
    let post =
        post_repository::create_post(pool, author.id, text, group_id, normalized(&input.image))
            .await?;
    Ok(post)
}

/// Validates and persists an edit to an existing post.
///
/// Only the author may edit; everyone else gets `Forbidden`, which the HTTP
/// layer turns into a redirect to the read-only detail view. The check order
/// matters: a missing post is `NotFound` and a foreign post is `Forbidden`
/// before any field validation runs.
pub async fn edit_post(
    pool: &PgPool,
    editor: &User,
    post_id: i64,
    input: &PostInput,
) -> Result<Post, AppError> {
    let post = post_repository::get_post(pool, post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    if post.author_id != editor.id {
        return Err(AppError::Forbidden);
    }

    let text = non_empty_text(&input.text, "post text must not be empty")?;
    let group_id = resolve_group(pool, input.group.as_deref()).await?;
    post_repository::update_post(pool, post_id, text, group_id, normalized(&input.image))
        .await?
        .ok_or(AppError::NotFound("post"))
}

/// Validates and persists a comment by `author` on the given post. Any
/// authenticated user may comment on any post.
pub async fn add_comment(
    pool: &PgPool,
    author: &User,
    post_id: i64,
    input: &CommentInput,
) -> Result<Comment, AppError> {
    let text = non_empty_text(&input.text, "comment text must not be empty")?;
    post_repository::get_post(pool, post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    let comment = comment_repository::create_comment(pool, post_id, author.id, text).await?;
    Ok(comment)
}

fn non_empty_text<'a>(raw: &'a str, message: &'static str) -> Result<&'a str, AppError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::validation("text", message));
    }
    Ok(text)
}

/// An empty or whitespace group field means "no group"; anything else must
/// resolve to a known slug.
async fn resolve_group(pool: &PgPool, slug: Option<&str>) -> Result<Option<i64>, AppError> {
    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => return Ok(None),
    };
    match group_repository::get_by_slug(pool, slug).await? {
        Some(group) => Ok(Some(group.id)),
        None => Err(AppError::validation("group", "unknown group")),
    }
}

fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
