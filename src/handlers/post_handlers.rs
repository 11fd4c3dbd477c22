use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::auth::AuthenticatedUser;
use crate::editor::{self, CommentInput, PostInput};
use crate::error::AppError;
use crate::feed::FeedFilter;
use crate::models::{Comment, Post};
use crate::repositories::{comment_repository, post_repository};
use crate::AppState;

#[derive(Serialize, Default)]
pub struct PostFormValues {
    pub text: String,
    pub group: String,
    pub image: Option<String>,
}

/// Context for the create/edit form. On validation failure the submitted
/// values come back with field-level errors and a success status — the page
/// re-renders, it does not error out.
#[derive(Serialize, Default)]
pub struct PostFormContext {
    pub values: PostFormValues,
    pub errors: HashMap<&'static str, &'static str>,
}

impl PostFormContext {
    fn with_error(input: &PostInput, field: &'static str, message: &'static str) -> Self {
        Self {
            values: PostFormValues {
                text: input.text.clone(),
                group: input.group.clone().unwrap_or_default(),
                image: input.image.clone(),
            },
            errors: HashMap::from([(field, message)]),
        }
    }

    fn prefilled(post: &Post) -> Self {
        Self {
            values: PostFormValues {
                text: post.text.clone(),
                group: post.group_slug.clone().unwrap_or_default(),
                image: post.image.clone(),
            },
            errors: HashMap::new(),
        }
    }
}

#[derive(Serialize, Default)]
pub struct CommentFormContext {
    pub text: String,
    pub errors: HashMap<&'static str, &'static str>,
}

#[derive(Serialize)]
pub struct PostDetailContext {
    pub post: Post,
    pub author_post_count: u64,
    pub comments: Vec<Comment>,
    pub comment_form: CommentFormContext,
}

/// Handler for the post detail page: the post, its comments (newest first)
/// and the author's total post count.
pub async fn post_detail_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Some(id) => id,
        None => return AppError::NotFound("post").into_response(),
    };
    match load_detail_context(&state.db_pool, post_id, CommentFormContext::default()).await {
        Ok(context) => Json(context).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for the blank new-post form.
pub async fn create_post_form_handler(_user: AuthenticatedUser) -> Response {
    Json(PostFormContext::default()).into_response()
}

/// Handler for new-post submission. The author is always the acting user; a
/// successful create redirects to their profile.
pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(input): Form<PostInput>,
) -> Response {
    match editor::create_post(&state.db_pool, &user.0, &input).await {
        Ok(post) => {
            info!(post_id = %post.id, author = %user.0.username, "created post");
            Redirect::to(&format!("/profile/{}", user.0.username)).into_response()
        }
        Err(AppError::Validation { field, message }) => (
            StatusCode::OK,
            Json(PostFormContext::with_error(&input, field, message)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for the edit form. Non-authors are sent to the read-only detail
/// view instead of seeing an error page.
pub async fn edit_post_form_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    user: AuthenticatedUser,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Some(id) => id,
        None => return AppError::NotFound("post").into_response(),
    };
    let post = match post_repository::get_post(&state.db_pool, post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => return AppError::NotFound("post").into_response(),
        Err(e) => return AppError::from(e).into_response(),
    };
    if post.author_id != user.0.id {
        return Redirect::to(&format!("/posts/{post_id}")).into_response();
    }
    Json(PostFormContext::prefilled(&post)).into_response()
}

/// Handler for edit submission. Only the author may edit; `created_at` never
/// changes.
pub async fn edit_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    user: AuthenticatedUser,
    Form(input): Form<PostInput>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Some(id) => id,
        None => return AppError::NotFound("post").into_response(),
    };
    match editor::edit_post(&state.db_pool, &user.0, post_id, &input).await {
        Ok(post) => {
            info!(post_id = %post.id, editor = %user.0.username, "updated post");
            Redirect::to(&format!("/posts/{}", post.id)).into_response()
        }
        Err(AppError::Forbidden) => {
            warn!(post_id = %post_id, editor = %user.0.username, "non-author attempted to edit post");
            Redirect::to(&format!("/posts/{post_id}")).into_response()
        }
        Err(AppError::Validation { field, message }) => (
            StatusCode::OK,
            Json(PostFormContext::with_error(&input, field, message)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for comment submission: redirect back to the detail page on
/// success, re-render the detail context with field errors otherwise.
pub async fn add_comment_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    user: AuthenticatedUser,
    Form(input): Form<CommentInput>,
) -> Response {
    let post_id = match parse_post_id(&post_id) {
        Some(id) => id,
        None => return AppError::NotFound("post").into_response(),
    };
    match editor::add_comment(&state.db_pool, &user.0, post_id, &input).await {
        Ok(comment) => {
            info!(comment_id = %comment.id, post_id = %post_id, author = %user.0.username, "added comment");
            Redirect::to(&format!("/posts/{post_id}")).into_response()
        }
        Err(AppError::Validation { field, message }) => {
            let form = CommentFormContext {
                text: input.text.clone(),
                errors: HashMap::from([(field, message)]),
            };
            match load_detail_context(&state.db_pool, post_id, form).await {
                Ok(context) => (StatusCode::OK, Json(context)).into_response(),
                Err(e) => e.into_response(),
            }
        }
        Err(e) => e.into_response(),
    }
}

async fn load_detail_context(
    pool: &PgPool,
    post_id: i64,
    comment_form: CommentFormContext,
) -> Result<PostDetailContext, AppError> {
    let post = post_repository::get_post(pool, post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    let comments = comment_repository::list_for_post(pool, post_id).await?;
    let author_post_count =
        post_repository::count_posts(pool, &FeedFilter::Author(post.author_id)).await?;
    Ok(PostDetailContext {
        post,
        author_post_count: u64::try_from(author_post_count).unwrap_or_default(),
        comments,
        comment_form,
    })
}

// Route parameters are matched as strings so a malformed id is a plain
// not-found rather than a bad-request.
fn parse_post_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}
