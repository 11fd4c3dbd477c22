// tests/group_api.rs

mod common;

use axum::http::StatusCode;
use blog_server::create_router;
use sqlx::PgPool;

use common::helpers::{
    create_test_app, create_test_group, get_json, post_group, read_json, test_config,
    TEST_ADMIN_TOKEN,
};

#[sqlx::test]
async fn admin_creates_group(pool: PgPool) {
    let app = create_test_app(pool).await;

    let group = create_test_group(&app, "Rustaceans", "rustaceans").await;
    assert_eq!(group.title, "Rustaceans");
    assert_eq!(group.slug, "rustaceans");

    let (status, context) = get_json(&app, "/group/rustaceans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(context["group"]["title"], "Rustaceans");
    assert_eq!(context["page"]["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test]
async fn group_creation_requires_the_admin_token(pool: PgPool) {
    let app = create_test_app(pool).await;

    let response = post_group(&app, None, "Rustaceans", "rustaceans").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_group(&app, Some("wrong-token"), "Rustaceans", "rustaceans").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn group_creation_disabled_without_configured_token(pool: PgPool) {
    let mut config = test_config();
    config.admin_token = None;
    let app = create_router(pool, &config);

    let response = post_group(&app, Some(TEST_ADMIN_TOKEN), "Rustaceans", "rustaceans").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn duplicate_slug_conflicts(pool: PgPool) {
    let app = create_test_app(pool).await;
    create_test_group(&app, "First", "shared-slug").await;

    let response = post_group(&app, Some(TEST_ADMIN_TOKEN), "Second", "shared-slug").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test]
async fn blank_group_fields_are_rejected(pool: PgPool) {
    let app = create_test_app(pool).await;

    let response = post_group(&app, Some(TEST_ADMIN_TOKEN), "", "slug").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["errors"]["title"].is_string());

    let response = post_group(&app, Some(TEST_ADMIN_TOKEN), "Title", " ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["errors"]["slug"].is_string());
}
