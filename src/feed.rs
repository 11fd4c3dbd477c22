use crate::error::AppError;
use crate::models::Post;
use crate::pagination::{Page, Pager};
use crate::repositories::post_repository;
use sqlx::PgPool;

/// Which posts a feed shows. Slugs and usernames are resolved to ids by the
/// handlers before composition, so a missing group or author surfaces as
/// `NotFound` at the HTTP boundary rather than an empty feed.
#[derive(Debug, Clone, Copy)]
pub enum FeedFilter {
    All,
    Group(i64),
    Author(i64),
    Following(i64),
}

/// Produces one ordered page of posts matching the filter.
///
/// Ordering is creation time descending with ties broken by insertion order.
/// The requested page number is clamped to the last page; the total match
/// count is carried on the page object (for the author filter it doubles as
/// the profile's post-count statistic).
pub async fn compose(
    pool: &PgPool,
    pager: &Pager,
    filter: FeedFilter,
    requested_page: u64,
) -> Result<Page<Post>, AppError> {
    let total = post_repository::count_posts(pool, &filter).await?;
    let total_items = u64::try_from(total).unwrap_or_default();
    let number = pager.clamp(requested_page, total_items);
    let posts =
        post_repository::list_posts(pool, &filter, pager.page_size(), pager.offset(number)).await?;
    Ok(pager.page_of(posts, number, total_items))
}
