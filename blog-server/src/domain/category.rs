use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A category together with the titles of the posts filed under it.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub posts: Vec<String>,
}
