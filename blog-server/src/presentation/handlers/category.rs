use crate::application::category_service::CategoryService;
use crate::data::category_repository::SqliteCategoryRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateCategoryRequest, ListCategoriesResponse, MessageResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post("/categories")]
pub async fn create_category(
    req: HttpRequest,
    categories: web::Data<CategoryService<SqliteCategoryRepository>>,
    payload: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, DomainError> {
    let name = payload.into_inner().into_name()?;
    let category = categories.create_category(name).await?;

    info!(
        request_id = %request_id(&req),
        category_id = category.id,
        "category created"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("Category created successfully!")))
}

#[get("/categories")]
pub async fn list_categories(
    categories: web::Data<CategoryService<SqliteCategoryRepository>>,
) -> Result<HttpResponse, DomainError> {
    let categories = categories.list_categories().await?;
    Ok(HttpResponse::Ok().json(ListCategoriesResponse { categories }))
}
