pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod utils;

use actix_web::web;

use crate::domain::error::DomainError;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(handlers::health::health)
        .service(handlers::user::create_user)
        .service(handlers::user::list_users)
        .service(handlers::post::create_post)
        .service(handlers::post::get_posts)
        .service(handlers::post::get_post)
        .service(handlers::post::update_post)
        .service(handlers::post::delete_post)
        .service(handlers::post::attach_category)
        .service(handlers::category::create_category)
        .service(handlers::category::list_categories);
}

/// Body errors (bad JSON, wrong content type) surface as `InvalidInput`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| DomainError::InvalidInput(err.to_string()).into())
}
