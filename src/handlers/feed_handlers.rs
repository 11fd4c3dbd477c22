use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::feed::{self, FeedFilter};
use crate::models::{Group, Post};
use crate::pagination::{Page, PageQuery};
use crate::repositories::group_repository;
use crate::AppState;

#[derive(Serialize)]
pub struct FeedContext {
    pub headline: &'static str,
    pub page: Page<Post>,
}

#[derive(Serialize)]
pub struct GroupFeedContext {
    pub headline: &'static str,
    pub group: Group,
    pub page: Page<Post>,
}

/// Handler for the home feed: every post, most recent first.
///
/// The response body is served from the TTL cache when a fresh copy exists;
/// writes do not evict, so the page may lag behind by up to the configured
/// TTL.
pub async fn index_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(page): Query<PageQuery>,
) -> Response {
    let cache_key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned());

    if let Some(body) = state.home_cache.get(&cache_key) {
        return json_body(body);
    }

    let page = match feed::compose(&state.db_pool, &state.pager, FeedFilter::All, page.number())
        .await
    {
        Ok(page) => page,
        Err(e) => return e.into_response(),
    };
    let context = FeedContext {
        headline: "Latest updates",
        page,
    };
    let body = match serde_json::to_string(&context) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "failed to serialize feed context");
            return (StatusCode::INTERNAL_SERVER_ERROR, "serialization error").into_response();
        }
    };
    state.home_cache.put(cache_key, body.clone());
    json_body(body)
}

/// Handler for the posts of a single group, resolved by slug.
pub async fn group_feed_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> Response {
    let group = match group_repository::get_by_slug(&state.db_pool, &slug).await {
        Ok(Some(group)) => group,
        Ok(None) => return AppError::NotFound("group").into_response(),
        Err(e) => {
            error!(error = %e, slug = %slug, "failed to resolve group");
            return AppError::from(e).into_response();
        }
    };

    match feed::compose(
        &state.db_pool,
        &state.pager,
        FeedFilter::Group(group.id),
        page.number(),
    )
    .await
    {
        Ok(page) => Json(GroupFeedContext {
            headline: "Group posts",
            group,
            page,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for the personalized feed: posts by the authors the acting user
/// follows. Anonymous callers never reach this — the extractor redirects them
/// to the login page.
pub async fn follow_feed_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> Response {
    match feed::compose(
        &state.db_pool,
        &state.pager,
        FeedFilter::Following(user.0.id),
        page.number(),
    )
    .await
    {
        Ok(page) => Json(FeedContext {
            headline: "Your subscriptions",
            page,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
