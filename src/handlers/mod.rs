use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub mod feed_handlers;
pub mod group_handlers;
pub mod post_handlers;
pub mod profile_handlers;

/// Custom not-found body for unknown routes and unresolved lookups.
pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "page not found" })),
    )
        .into_response()
}
