use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use constant_time_eq::constant_time_eq;
use tracing::error;

use crate::models::User;
use crate::repositories::user_repository;
use crate::AppState;

// Identity is asserted by the upstream identity layer; this service only
// trusts its headers.
pub const HEADER_USER: &str = "x-blog-user";
pub const HEADER_DISPLAY_NAME: &str = "x-blog-display-name";
pub const HEADER_ADMIN_TOKEN: &str = "x-admin-token";

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug)]
pub enum AuthRejection {
    /// No identity on an auth-required route: send the caller to the login
    /// page with a `next` parameter pointing back at the original URL.
    LoginRedirect { next: String },
    Database,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRedirect { next } => {
                Redirect::to(&format!("{LOGIN_PATH}?next={next}")).into_response()
            }
            AuthRejection::Database => {
                (StatusCode::INTERNAL_SERVER_ERROR, "authentication failed").into_response()
            }
        }
    }
}

/// The acting user on auth-required routes. The user row is upserted so the
/// record store always has a row to hang posts, comments and follow edges on.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let username = match header_value(&parts.headers, HEADER_USER) {
            Some(username) => username,
            None => {
                return Err(AuthRejection::LoginRedirect {
                    next: original_target(parts),
                })
            }
        };
        let user = upsert(state, &username, &parts.headers).await?;
        Ok(AuthenticatedUser(user))
    }
}

/// Like [`AuthenticatedUser`] but for routes anonymous callers may also use;
/// a missing identity yields `None` instead of a login redirect.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let username = match header_value(&parts.headers, HEADER_USER) {
            Some(username) => username,
            None => return Ok(MaybeUser(None)),
        };
        let user = upsert(state, &username, &parts.headers).await?;
        Ok(MaybeUser(Some(user)))
    }
}

/// Marker extractor for the administrative endpoints. The token comparison is
/// constant-time; an unset token disables administration entirely.
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

#[async_trait]
impl<S> FromRequestParts<S> for AdminToken
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let expected = state
            .admin_token
            .as_deref()
            .ok_or((StatusCode::FORBIDDEN, "administration disabled"))?;
        let provided = parts
            .headers
            .get(HEADER_ADMIN_TOKEN)
            .and_then(|value| value.to_str().ok())
            .ok_or((StatusCode::FORBIDDEN, "admin token required"))?;
        if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
            Ok(AdminToken)
        } else {
            Err((StatusCode::FORBIDDEN, "invalid admin token"))
        }
    }
}

async fn upsert<S>(state: &S, username: &str, headers: &HeaderMap) -> Result<User, AuthRejection>
where
    AppState: FromRef<S>,
{
    let display_name = header_value(headers, HEADER_DISPLAY_NAME);
    let state = AppState::from_ref(state);
    user_repository::upsert_user(&state.db_pool, username, display_name.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, username = %username, "failed to upsert authenticated user");
            AuthRejection::Database
        })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn original_target(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned())
}
