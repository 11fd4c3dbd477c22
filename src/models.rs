use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user known to this service. Identity itself lives in the upstream
/// identity layer; rows here are created on first authenticated request
/// and referenced by posts, comments and follow edges.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// A topical group posts can be assigned to. The slug is the external key
/// used in URLs.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post, denormalized with the author and group display fields every feed
/// needs. `group_*` fields are null for group-less posts.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

/// A comment attached to exactly one post for its lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
}
