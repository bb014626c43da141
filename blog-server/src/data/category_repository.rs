use std::collections::HashMap;

use crate::data::{read_error, write_error};
use crate::domain::category::{Category, CategorySummary};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Category, DomainError>;
    async fn list_with_post_titles(&self) -> Result<Vec<CategorySummary>, DomainError>;
}

#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category, DomainError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                || DomainError::Conflict(format!("category `{}` already exists", name)),
                || DomainError::Internal("unexpected foreign key on categories".into()),
            )
        })?;

        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn list_with_post_titles(&self) -> Result<Vec<CategorySummary>, DomainError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(read_error)?;

        let titles = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pc.category_id, p.title
            FROM post_category pc
            JOIN posts p ON p.id = pc.post_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        let mut by_category: HashMap<i64, Vec<String>> = HashMap::new();
        for (category_id, title) in titles {
            by_category.entry(category_id).or_default().push(title);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategorySummary {
                posts: by_category.remove(&category.id).unwrap_or_default(),
                id: category.id,
                name: category.name,
            })
            .collect())
    }
}
