use crate::application::user_service::UserService;
use crate::data::user_repository::SqliteUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateUserRequest, ListUsersResponse, MessageResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post("/users")]
pub async fn create_user(
    req: HttpRequest,
    users: web::Data<UserService<SqliteUserRepository>>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let username = payload.into_inner().into_username()?;
    let user = users.create_user(username).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        "user created"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("User created successfully!")))
}

#[get("/users")]
pub async fn list_users(
    users: web::Data<UserService<SqliteUserRepository>>,
) -> Result<HttpResponse, DomainError> {
    let users = users.list_users().await?;
    Ok(HttpResponse::Ok().json(ListUsersResponse { users }))
}
