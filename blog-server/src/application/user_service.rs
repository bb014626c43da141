use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserSummary};

#[derive(Clone)]
pub struct UserService<R: UserRepository + 'static> {
    repo: Arc<R>,
}

impl<R> UserService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, username: String) -> Result<User, DomainError> {
        self.repo.create(&username).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, DomainError> {
        self.repo.list_with_post_titles().await
    }
}
