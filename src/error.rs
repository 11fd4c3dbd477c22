use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;

/// The error taxonomy shared by the feed composer, follow manager and the
/// post/comment editor.
///
/// Handlers intercept the variants that have page-level semantics
/// (`Validation` re-renders the form context, `Forbidden` redirects to the
/// read-only detail view); the fallback responses below cover everything
/// a handler does not special-case.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("permission denied")]
    Forbidden,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        AppError::Validation { field, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { field, message } => {
                let errors = HashMap::from([(field, message)]);
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{what} not found") })),
            )
                .into_response(),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "permission denied").into_response(),
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
