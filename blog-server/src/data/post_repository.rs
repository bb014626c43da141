use std::collections::HashMap;

use crate::data::{read_error, write_error};
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostDetails};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<PostDetails>, DomainError>;
    async fn list(&self) -> Result<Vec<PostDetails>, DomainError>;
    /// Returns `false` when no post has the given id.
    async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<bool, DomainError>;
    /// Returns `false` when no post has the given id.
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn attach_category(&self, post_id: i64, category_id: i64) -> Result<(), DomainError>;
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    date_posted: DateTime<Utc>,
    author: String,
}

impl PostRow {
    fn into_details(self, categories: Vec<String>) -> PostDetails {
        PostDetails {
            id: self.id,
            title: self.title,
            content: self.content,
            date_posted: self.date_posted,
            author: self.author,
            categories,
        }
    }
}

#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn category_names(&self, post_id: i64) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT c.name
            FROM post_category pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await.map_err(read_error)?;

        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content, date_posted)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, content, date_posted
            "#,
        )
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.date_posted)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            write_error(
                e,
                || DomainError::Internal("unexpected unique constraint on posts".into()),
                || DomainError::ReferentialError(format!("user {} does not exist", post.user_id)),
            )
        })?;

        for category_id in &post.category_ids {
            sqlx::query("INSERT INTO post_category (post_id, category_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    write_error(
                        e,
                        || DomainError::Conflict(format!("category {} listed twice", category_id)),
                        || {
                            DomainError::ReferentialError(format!(
                                "category {} does not exist",
                                category_id
                            ))
                        },
                    )
                })?;
        }

        tx.commit().await.map_err(read_error)?;

        info!(post_id = created.id, user_id = created.user_id, "post created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostDetails>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.title, p.content, p.date_posted, u.username AS author
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        match row {
            Some(row) => {
                let categories = self.category_names(row.id).await?;
                Ok(Some(row.into_details(categories)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<PostDetails>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.title, p.content, p.date_posted, u.username AS author
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        let pairs = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pc.post_id, c.name
            FROM post_category pc
            JOIN categories c ON c.id = pc.category_id
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        let mut by_post: HashMap<i64, Vec<String>> = HashMap::new();
        for (post_id, name) in pairs {
            by_post.entry(post_id).or_default().push(name);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let categories = by_post.remove(&row.id).unwrap_or_default();
                row.into_details(categories)
            })
            .collect())
    }

    async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<bool, DomainError> {
        let now = Utc::now();
        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $1, content = $2, date_posted = $3
            WHERE id = $4
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                || DomainError::Internal("unexpected unique constraint on posts".into()),
                || DomainError::Internal("unexpected foreign key on posts".into()),
            )
        })?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id = id, "post updated");
        Ok(true)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    || DomainError::Internal("unexpected unique constraint on posts".into()),
                    || DomainError::Internal("post still referenced".into()),
                )
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id = id, "post deleted");
        Ok(true)
    }

    async fn attach_category(&self, post_id: i64, category_id: i64) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(read_error)?;

        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(read_error)?;
        if !post_exists {
            return Err(DomainError::PostNotFound(post_id));
        }

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(read_error)?;
        if !category_exists {
            return Err(DomainError::CategoryNotFound(category_id));
        }

        sqlx::query("INSERT INTO post_category (post_id, category_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    || {
                        DomainError::Conflict(format!(
                            "post {} is already in category {}",
                            post_id, category_id
                        ))
                    },
                    || DomainError::ReferentialError("post or category vanished".into()),
                )
            })?;

        tx.commit().await.map_err(read_error)?;

        info!(post_id, category_id, "category attached to post");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connect_in_memory;

    struct Fixture {
        pool: SqlitePool,
        repo: SqlitePostRepository,
    }

    async fn fixture() -> Fixture {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (username) VALUES ('alice')")
            .execute(&pool)
            .await
            .unwrap();
        for name in ["tech", "rust"] {
            sqlx::query("INSERT INTO categories (name) VALUES ($1)")
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }
        Fixture {
            repo: SqlitePostRepository::new(pool.clone()),
            pool,
        }
    }

    fn new_post(user_id: i64, category_ids: Vec<i64>) -> NewPost {
        NewPost::new(user_id, "Hello".into(), "World".into(), category_ids)
    }

    async fn join_rows(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM post_category")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_find_projects_author_and_categories() {
        let f = fixture().await;

        let post = f.repo.create(new_post(1, vec![2, 1])).await.unwrap();
        let found = f.repo.find_by_id(post.id).await.unwrap().unwrap();

        assert_eq!(found.title, "Hello");
        assert_eq!(found.content, "World");
        assert_eq!(found.author, "alice");
        assert_eq!(found.categories, vec!["rust", "tech"]);
        assert_eq!(found.date_posted, post.date_posted);
    }

    #[tokio::test]
    async fn unknown_user_is_referential_error_and_persists_nothing() {
        let f = fixture().await;

        let err = f.repo.create(new_post(42, vec![])).await.unwrap_err();

        assert!(matches!(err, DomainError::ReferentialError(_)));
        assert!(f.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_rolls_back_the_post() {
        let f = fixture().await;

        let err = f.repo.create(new_post(1, vec![1, 77])).await.unwrap_err();

        assert!(matches!(err, DomainError::ReferentialError(_)));
        assert!(f.repo.list().await.unwrap().is_empty());
        assert_eq!(join_rows(&f.pool).await, 0);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let f = fixture().await;
        assert!(f.repo.find_by_id(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_rewrites_fields_and_refreshes_date() {
        let f = fixture().await;
        let post = f.repo.create(new_post(1, vec![1])).await.unwrap();

        assert!(f.repo.update_post(post.id, "New", "Body").await.unwrap());

        let found = f.repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.title, "New");
        assert_eq!(found.content, "Body");
        assert!(found.date_posted >= post.date_posted);
        assert_eq!(found.categories, vec!["tech"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let f = fixture().await;

        assert!(!f.repo.update_post(9, "t", "c").await.unwrap());
        assert!(!f.repo.delete_post(9).await.unwrap());
    }

    #[tokio::test]
    async fn delete_cascades_join_rows() {
        let f = fixture().await;
        let post = f.repo.create(new_post(1, vec![1, 2])).await.unwrap();
        assert_eq!(join_rows(&f.pool).await, 2);

        assert!(f.repo.delete_post(post.id).await.unwrap());

        assert!(f.repo.find_by_id(post.id).await.unwrap().is_none());
        assert_eq!(join_rows(&f.pool).await, 0);
    }

    #[tokio::test]
    async fn attach_category_checks_both_sides() {
        let f = fixture().await;
        let post = f.repo.create(new_post(1, vec![])).await.unwrap();

        f.repo.attach_category(post.id, 1).await.unwrap();

        assert!(matches!(
            f.repo.attach_category(post.id, 1).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            f.repo.attach_category(99, 1).await.unwrap_err(),
            DomainError::PostNotFound(99)
        ));
        assert!(matches!(
            f.repo.attach_category(post.id, 99).await.unwrap_err(),
            DomainError::CategoryNotFound(99)
        ));

        let found = f.repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.categories, vec!["tech"]);
    }

    #[tokio::test]
    async fn list_returns_every_post_with_its_categories() {
        let f = fixture().await;
        f.repo.create(new_post(1, vec![1])).await.unwrap();
        f.repo.create(new_post(1, vec![])).await.unwrap();

        let posts = f.repo.list().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].categories, vec!["tech"]);
        assert!(posts[1].categories.is_empty());
        assert!(posts.iter().all(|p| p.author == "alice"));
    }
}
