use std::collections::HashMap;

use crate::data::{read_error, write_error};
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserSummary};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, username: &str) -> Result<User, DomainError>;
    async fn list_with_post_titles(&self) -> Result<Vec<UserSummary>, DomainError>;
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, username: &str) -> Result<User, DomainError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                || DomainError::Conflict(format!("username `{}` already exists", username)),
                || DomainError::Internal("unexpected foreign key on users".into()),
            )
        })?;

        info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn list_with_post_titles(&self) -> Result<Vec<UserSummary>, DomainError> {
        let users = sqlx::query_as::<_, User>("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?;

        let titles = sqlx::query_as::<_, (i64, String)>(
            "SELECT user_id, title FROM posts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        let mut by_user: HashMap<i64, Vec<String>> = HashMap::new();
        for (user_id, title) in titles {
            by_user.entry(user_id).or_default().push(title);
        }

        Ok(users
            .into_iter()
            .map(|user| UserSummary {
                posts: by_user.remove(&user.id).unwrap_or_default(),
                id: user.id,
                username: user.username,
            })
            .collect())
    }
}
