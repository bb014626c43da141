pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use std::sync::Arc;

use actix_web::web;
use sqlx::SqlitePool;

use application::category_service::CategoryService;
use application::post_service::PostService;
use application::user_service::UserService;
use data::category_repository::SqliteCategoryRepository;
use data::post_repository::SqlitePostRepository;
use data::user_repository::SqliteUserRepository;

/// Services wired to one shared pool, handed to every worker.
#[derive(Clone)]
pub struct Services {
    pub users: UserService<SqliteUserRepository>,
    pub posts: PostService<SqlitePostRepository>,
    pub categories: CategoryService<SqliteCategoryRepository>,
}

impl Services {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserService::new(Arc::new(SqliteUserRepository::new(pool.clone()))),
            posts: PostService::new(Arc::new(SqlitePostRepository::new(pool.clone()))),
            categories: CategoryService::new(Arc::new(SqliteCategoryRepository::new(pool))),
        }
    }

    /// Registers the services as app data together with every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.categories.clone()))
            .configure(presentation::routes);
    }
}
