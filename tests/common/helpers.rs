// tests/common/helpers.rs
//! Shared helper functions for integration tests

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    response::Response,
    Router,
};
use blog_server::{config::Config, create_router, models::Group};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        database_url: String::new(),
        page_size: 10,
        // Caching off by default so feed assertions always see fresh data.
        home_cache_ttl_seconds: 0,
        admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
    }
}

pub async fn create_test_app(pool: PgPool) -> Router {
    create_router(pool, &test_config())
}

pub async fn get_response(app: &Router, uri: &str, user: Option<&str>) -> Response {
    let mut builder = Request::builder().method(http::Method::GET).uri(uri);
    if let Some(username) = user {
        builder = builder.header("x-blog-user", username);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

pub async fn get_json(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let response = get_response(app, uri, user).await;
    let status = response.status();
    (status, read_json(response).await)
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(http::header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn post_form(app: &Router, uri: &str, user: Option<&str>, body: &str) -> Response {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
        );
    if let Some(username) = user {
        builder = builder.header("x-blog-user", username);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn post_group(
    app: &Router,
    token: Option<&str>,
    title: &str,
    slug: &str,
) -> Response {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri("/groups")
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(token) = token {
        builder = builder.header("x-admin-token", token);
    }
    let body = json!({ "title": title, "slug": slug, "description": "..." }).to_string();
    app.clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

pub async fn create_test_group(app: &Router, title: &str, slug: &str) -> Group {
    let response = post_group(app, Some(TEST_ADMIN_TOKEN), title, slug).await;
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status,
        StatusCode::CREATED,
        "failed to create group: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("failed to deserialize group in helper")
}

/// Submits the new-post form as `username`. Spaces in `text` are form-encoded.
pub async fn create_test_post(app: &Router, username: &str, text: &str, group_slug: Option<&str>) {
    let mut body = format!("text={}", text.replace(' ', "+"));
    if let Some(slug) = group_slug {
        body.push_str(&format!("&group={slug}"));
    }
    let response = post_form(app, "/create", Some(username), &body).await;
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "failed to create post"
    );
}

/// ID of the author's most recent post, read off their profile feed.
pub async fn latest_post_id(app: &Router, username: &str) -> i64 {
    let (status, context) = get_json(app, &format!("/profile/{username}"), None).await;
    assert_eq!(status, StatusCode::OK);
    context["page"]["items"][0]["id"]
        .as_i64()
        .expect("expected at least one post on the profile")
}
