use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;

pub mod auth;
pub mod cache;
pub mod config;
pub mod editor;
pub mod error;
pub mod feed;
pub mod follow;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repositories;

use cache::ResponseCache;
use config::Config;
use handlers::{feed_handlers, group_handlers, post_handlers, profile_handlers};
use pagination::Pager;

const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;
const HOME_CACHE_CAPACITY: usize = 128;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub pager: Pager,
    pub home_cache: Arc<ResponseCache>,
    pub admin_token: Option<Arc<str>>,
}

/// Builds the application router over a connected pool.
pub fn create_router(db_pool: PgPool, config: &Config) -> Router {
    let state = AppState {
        db_pool,
        pager: Pager::new(config.page_size),
        home_cache: Arc::new(ResponseCache::new(
            Duration::from_secs(config.home_cache_ttl_seconds),
            HOME_CACHE_CAPACITY,
        )),
        admin_token: config.admin_token.as_deref().map(Arc::from),
    };

    Router::new()
        .route("/", get(feed_handlers::index_handler))
        .route("/follow", get(feed_handlers::follow_feed_handler))
        .route("/group/:slug", get(feed_handlers::group_feed_handler))
        .route("/groups", post(group_handlers::create_group_handler))
        .route(
            "/profile/:username",
            get(profile_handlers::profile_handler),
        )
        .route(
            "/profile/:username/follow",
            get(profile_handlers::follow_author_handler),
        )
        .route(
            "/profile/:username/unfollow",
            get(profile_handlers::unfollow_author_handler),
        )
        .route(
            "/create",
            get(post_handlers::create_post_form_handler).post(post_handlers::create_post_handler),
        )
        .route("/posts/:post_id", get(post_handlers::post_detail_handler))
        .route(
            "/posts/:post_id/edit",
            get(post_handlers::edit_post_form_handler).post(post_handlers::edit_post_handler),
        )
        .route(
            "/posts/:post_id/comment",
            post(post_handlers::add_comment_handler),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}
