use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::auth::AdminToken;
use crate::error::AppError;
use crate::repositories::group_repository;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Handler for the administrative group-creation endpoint. Groups are
/// immutable once created; posts reference them by slug.
pub async fn create_group_handler(
    State(state): State<AppState>,
    _admin: AdminToken,
    Json(data): Json<NewGroup>,
) -> Response {
    let title = data.title.trim();
    let slug = data.slug.trim();
    if title.is_empty() {
        return AppError::validation("title", "group title must not be empty").into_response();
    }
    if slug.is_empty() {
        return AppError::validation("slug", "group slug must not be empty").into_response();
    }

    match group_repository::create_group(&state.db_pool, title, slug, data.description.trim())
        .await
    {
        Ok(group) => {
            info!(group_id = %group.id, slug = %group.slug, "created group");
            (StatusCode::CREATED, Json(group)).into_response()
        }
        Err(e) if group_repository::is_slug_conflict(&e) => {
            warn!(slug = %slug, "group slug already taken");
            (
                StatusCode::CONFLICT,
                "a group with this slug already exists",
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, slug = %slug, "failed to create group");
            AppError::from(e).into_response()
        }
    }
}
