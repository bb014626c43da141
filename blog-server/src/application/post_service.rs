use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostDetails};
use tracing::instrument;

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: i64) -> Result<PostDetails, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_posts(&self) -> Result<Vec<PostDetails>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self, post), fields(user_id = post.user_id))]
    pub async fn create_post(&self, post: NewPost) -> Result<Post, DomainError> {
        self.repo.create(post).await
    }

    #[instrument(skip(self, title, content))]
    pub async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
    ) -> Result<(), DomainError> {
        if self.repo.update_post(post_id, title, content).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: i64) -> Result<(), DomainError> {
        if self.repo.delete_post(post_id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }

    #[instrument(skip(self))]
    pub async fn attach_category(&self, post_id: i64, category_id: i64) -> Result<(), DomainError> {
        self.repo.attach_category(post_id, category_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Repository that has never stored anything.
    struct EmptyRepository;

    #[async_trait]
    impl PostRepository for EmptyRepository {
        async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
            Err(DomainError::ReferentialError(format!(
                "user {} does not exist",
                post.user_id
            )))
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<PostDetails>, DomainError> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<PostDetails>, DomainError> {
            Ok(Vec::new())
        }

        async fn update_post(&self, _: i64, _: &str, _: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn attach_category(&self, post_id: i64, _: i64) -> Result<(), DomainError> {
            Err(DomainError::PostNotFound(post_id))
        }
    }

    fn service() -> PostService<EmptyRepository> {
        PostService::new(Arc::new(EmptyRepository))
    }

    #[tokio::test]
    async fn missing_rows_become_not_found() {
        let service = service();

        assert!(matches!(
            service.get_post(7).await,
            Err(DomainError::PostNotFound(7))
        ));
        assert!(matches!(
            service.update_post(7, "t", "c").await,
            Err(DomainError::PostNotFound(7))
        ));
        assert!(matches!(
            service.delete_post(7).await,
            Err(DomainError::PostNotFound(7))
        ));
    }

    #[tokio::test]
    async fn repository_errors_pass_through() {
        let post = NewPost::new(3, "t".into(), "c".into(), vec![]);

        assert!(matches!(
            service().create_post(post).await,
            Err(DomainError::ReferentialError(_))
        ));
    }
}
