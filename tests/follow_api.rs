// tests/follow_api.rs

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::helpers::{create_test_app, create_test_post, get_json, get_response, location};

async fn follow_edge_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn follow_feed_shows_followed_authors_posts(pool: PgPool) {
    let app = create_test_app(pool).await;
    create_test_post(&app, "bob", "bob-one", None).await;
    create_test_post(&app, "bob", "bob-two", None).await;
    create_test_post(&app, "carol", "carol-one", None).await;

    let response = get_response(&app, "/profile/bob/follow", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile/bob");

    let (status, context) = get_json(&app, "/follow", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    let items = context["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["text"], "bob-two");
    assert_eq!(items[1]["text"], "bob-one");
    assert!(items.iter().all(|item| item["author_username"] == "bob"));

    let response = get_response(&app, "/profile/bob/unfollow", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, context) = get_json(&app, "/follow", Some("alice")).await;
    assert_eq!(context["page"]["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test]
async fn repeated_follow_keeps_a_single_edge(pool: PgPool) {
    let app = create_test_app(pool.clone()).await;
    create_test_post(&app, "bob", "hello", None).await;

    get_response(&app, "/profile/bob/follow", Some("alice")).await;
    get_response(&app, "/profile/bob/follow", Some("alice")).await;
    assert_eq!(follow_edge_count(&pool).await, 1);

    get_response(&app, "/profile/bob/unfollow", Some("alice")).await;
    assert_eq!(follow_edge_count(&pool).await, 0);

    // Unfollowing again is a no-op, not an error.
    let response = get_response(&app, "/profile/bob/unfollow", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(follow_edge_count(&pool).await, 0);
}

#[sqlx::test]
async fn self_follow_is_ignored(pool: PgPool) {
    let app = create_test_app(pool.clone()).await;
    create_test_post(&app, "alice", "hello", None).await;

    let response = get_response(&app, "/profile/alice/follow", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(follow_edge_count(&pool).await, 0);

    let (_, context) = get_json(&app, "/follow", Some("alice")).await;
    assert_eq!(context["page"]["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test]
async fn profile_reports_follow_status_for_the_viewer(pool: PgPool) {
    let app = create_test_app(pool).await;
    create_test_post(&app, "bob", "hello", None).await;
    get_response(&app, "/profile/bob/follow", Some("alice")).await;

    let (_, as_alice) = get_json(&app, "/profile/bob", Some("alice")).await;
    assert_eq!(as_alice["following"], true);

    let (_, as_carol) = get_json(&app, "/profile/bob", Some("carol")).await;
    assert_eq!(as_carol["following"], false);

    let (_, anonymous) = get_json(&app, "/profile/bob", None).await;
    assert_eq!(anonymous["following"], false);
}

#[sqlx::test]
async fn follow_unknown_author_is_not_found(pool: PgPool) {
    let app = create_test_app(pool).await;

    let response = get_response(&app, "/profile/ghost/follow", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn follow_routes_require_login(pool: PgPool) {
    let app = create_test_app(pool).await;
    create_test_post(&app, "bob", "hello", None).await;

    let response = get_response(&app, "/profile/bob/follow", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?next=/profile/bob/follow");
}
