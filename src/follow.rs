use crate::error::AppError;
use crate::models::User;
use crate::repositories::follow_repository;
use sqlx::PgPool;
use tracing::debug;

/// Creates the follow edge from `follower` to `author`.
///
/// Idempotent: repeating the call leaves exactly one edge. Following yourself
/// is tolerated as a silent no-op — no edge is stored.
pub async fn follow(pool: &PgPool, follower: &User, author: &User) -> Result<(), AppError> {
    if follower.id == author.id {
        debug!(username = %follower.username, "ignoring self-follow");
        return Ok(());
    }
    follow_repository::insert(pool, follower.id, author.id).await?;
    Ok(())
}

/// Removes the follow edge from `follower` to `author`.
///
/// Idempotent: unfollowing without a prior follow is a no-op.
pub async fn unfollow(pool: &PgPool, follower: &User, author: &User) -> Result<(), AppError> {
    if follower.id == author.id {
        return Ok(());
    }
    follow_repository::delete(pool, follower.id, author.id).await?;
    Ok(())
}

/// Whether `follower` currently follows `author`.
pub async fn is_following(pool: &PgPool, follower: &User, author: &User) -> Result<bool, AppError> {
    Ok(follow_repository::exists(pool, follower.id, author.id).await?)
}
