use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::auth::{AuthenticatedUser, MaybeUser};
use crate::error::AppError;
use crate::feed::{self, FeedFilter};
use crate::follow;
use crate::models::{Post, User};
use crate::pagination::{Page, PageQuery};
use crate::repositories::user_repository;
use crate::AppState;

#[derive(Serialize)]
pub struct ProfileContext {
    pub author: User,
    pub post_count: u64,
    /// Whether the acting viewer follows this author; always false for
    /// anonymous viewers.
    pub following: bool,
    pub page: Page<Post>,
}

/// Handler for an author's profile: their posts, their total post count and
/// the viewer's follow status.
pub async fn profile_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    MaybeUser(viewer): MaybeUser,
    Query(page): Query<PageQuery>,
) -> Response {
    let author = match resolve_author(&state, &username).await {
        Ok(author) => author,
        Err(e) => return e.into_response(),
    };

    let page = match feed::compose(
        &state.db_pool,
        &state.pager,
        FeedFilter::Author(author.id),
        page.number(),
    )
    .await
    {
        Ok(page) => page,
        Err(e) => return e.into_response(),
    };

    let following = match viewer {
        Some(viewer) => match follow::is_following(&state.db_pool, &viewer, &author).await {
            Ok(following) => following,
            Err(e) => return e.into_response(),
        },
        None => false,
    };

    Json(ProfileContext {
        post_count: page.total_items,
        author,
        following,
        page,
    })
    .into_response()
}

/// Handler that subscribes the acting user to an author, then returns to the
/// profile. Repeats and self-follows are silent no-ops.
pub async fn follow_author_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthenticatedUser,
) -> Response {
    let author = match resolve_author(&state, &username).await {
        Ok(author) => author,
        Err(e) => return e.into_response(),
    };
    match follow::follow(&state.db_pool, &user.0, &author).await {
        Ok(()) => {
            info!(follower = %user.0.username, author = %author.username, "follow");
            Redirect::to(&format!("/profile/{username}")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handler that removes the subscription, then returns to the profile.
pub async fn unfollow_author_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthenticatedUser,
) -> Response {
    let author = match resolve_author(&state, &username).await {
        Ok(author) => author,
        Err(e) => return e.into_response(),
    };
    match follow::unfollow(&state.db_pool, &user.0, &author).await {
        Ok(()) => {
            info!(follower = %user.0.username, author = %author.username, "unfollow");
            Redirect::to(&format!("/profile/{username}")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn resolve_author(state: &AppState, username: &str) -> Result<User, AppError> {
    match user_repository::get_by_username(&state.db_pool, username).await {
        Ok(Some(author)) => Ok(author),
        Ok(None) => Err(AppError::NotFound("profile")),
        Err(e) => {
            error!(error = %e, username = %username, "failed to resolve author");
            Err(AppError::from(e))
        }
    }
}
