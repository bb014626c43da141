use crate::application::post_service::PostService;
use crate::data::post_repository::SqlitePostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    AttachCategoryRequest, CreatePostRequest, ListPostsResponse, MessageResponse, PostResponse,
    UpdatePostRequest,
};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;

type Posts = web::Data<PostService<SqlitePostRepository>>;

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    posts: Posts,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let new_post = payload.into_inner().into_new_post()?;
    let post = posts.create_post(new_post).await?;

    info!(
        request_id = %request_id(&req),
        post_id = post.id,
        user_id = post.user_id,
        "post created"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("Post created successfully!")))
}

#[get("/posts")]
pub async fn get_posts(posts: Posts) -> Result<HttpResponse, DomainError> {
    let posts = posts.get_posts().await?;
    Ok(HttpResponse::Ok().json(ListPostsResponse { posts }))
}

#[get("/posts/{id}")]
pub async fn get_post(posts: Posts, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse { post }))
}

#[put("/posts/{id}")]
pub async fn update_post(
    req: HttpRequest,
    posts: Posts,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let (title, content) = payload.into_inner().into_fields()?;
    posts.update_post(post_id, &title, &content).await?;

    info!(request_id = %request_id(&req), post_id, "post updated");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post updated successfully!")))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    posts: Posts,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully!")))
}

#[post("/posts/{id}/categories")]
pub async fn attach_category(
    req: HttpRequest,
    posts: Posts,
    path: web::Path<i64>,
    payload: web::Json<AttachCategoryRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let category_id = payload.into_inner().into_category_id()?;
    posts.attach_category(post_id, category_id).await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        category_id,
        "category attached"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("Category added to post successfully!")))
}
