use crate::domain::category::CategorySummary;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, PostDetails};
use crate::domain::user::UserSummary;
use serde::{Deserialize, Serialize};

// Request fields are optional so that a missing field is reported as
// `InvalidInput` naming the field instead of a generic JSON error.

fn required<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::missing_field(field))
}

// ======================= USERS =======================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
}

impl CreateUserRequest {
    pub fn into_username(self) -> Result<String, DomainError> {
        required(self.username, "username")
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserSummary>,
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

impl CreatePostRequest {
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        let title = required(self.title, "title")?;
        let content = required(self.content, "content")?;
        let user_id = required(self.user_id, "user_id")?;
        Ok(NewPost::new(user_id, title, content, self.category_ids))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    /// Both fields are overwritten, so both must be present.
    pub fn into_fields(self) -> Result<(String, String), DomainError> {
        Ok((
            required(self.title, "title")?,
            required(self.content, "content")?,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct AttachCategoryRequest {
    pub category_id: Option<i64>,
}

impl AttachCategoryRequest {
    pub fn into_category_id(self) -> Result<i64, DomainError> {
        required(self.category_id, "category_id")
    }
}

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostDetails>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: PostDetails,
}

// ===================== CATEGORIES =====================

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_name(self) -> Result<String, DomainError> {
        required(self.name, "name")
    }
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategorySummary>,
}

// ======================= Utils =======================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_post_names_the_first_missing_field() {
        let request: CreatePostRequest = parse(json!({ "title": "Hello", "user_id": 1 }));

        match request.into_new_post() {
            Err(DomainError::InvalidInput(message)) => assert!(message.contains("`content`")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let request: CreateUserRequest = parse(json!({ "username": null }));
        assert!(matches!(
            request.into_username(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn category_ids_are_optional() {
        let request: CreatePostRequest =
            parse(json!({ "title": "Hello", "content": "World", "user_id": 1 }));

        let post = request.into_new_post().unwrap();
        assert_eq!(post.user_id, 1);
        assert!(post.category_ids.is_empty());
    }

    #[test]
    fn update_requires_both_fields() {
        let request: UpdatePostRequest = parse(json!({ "title": "only title" }));
        assert!(request.into_fields().is_err());

        let request: UpdatePostRequest = parse(json!({ "title": "t", "content": "c" }));
        assert_eq!(request.into_fields().unwrap(), ("t".to_string(), "c".to_string()));
    }
}
