use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub category_ids: Vec<i64>,
    pub date_posted: DateTime<Utc>,
}

impl NewPost {
    pub fn new(user_id: i64, title: String, content: String, mut category_ids: Vec<i64>) -> Self {
        category_ids.sort_unstable();
        category_ids.dedup();
        Self {
            user_id,
            title,
            content,
            category_ids,
            date_posted: Utc::now(),
        }
    }
}

/// Read projection of a post: the owner's username instead of the user id,
/// plus the names of its categories.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author: String,
    pub categories: Vec<String>,
}
