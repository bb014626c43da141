use std::sync::Arc;

use tracing::instrument;

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::{Category, CategorySummary};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository + 'static> {
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: String) -> Result<Category, DomainError> {
        self.repo.create(&name).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>, DomainError> {
        self.repo.list_with_post_titles().await
    }
}
