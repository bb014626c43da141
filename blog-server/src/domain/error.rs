use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("referential error: {0}")]
    ReferentialError(String),
    #[error("post not found: {0}")]
    PostNotFound(i64),
    #[error("category not found: {0}")]
    CategoryNotFound(i64),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn missing_field(field: &str) -> Self {
        DomainError::InvalidInput(format!("missing required field `{}`", field))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::ReferentialError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::PostNotFound(_) | DomainError::CategoryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // storage details stay in the logs
        let message = match self {
            DomainError::Internal(_) => "internal server error".to_string(),
            _ => self.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(id) => Some(json!({ "resource": "post", "id": id })),
            DomainError::CategoryNotFound(id) => {
                Some(json!({ "resource": "category", "id": id }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_variants_to_client_statuses() {
        assert_eq!(
            DomainError::missing_field("title").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::Conflict("username".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::ReferentialError("user 9".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::PostNotFound(3).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn not_found_body_names_the_resource() {
        let response = DomainError::PostNotFound(42).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "post not found: 42");
        assert_eq!(body["details"]["resource"], "post");
        assert_eq!(body["details"]["id"], 42);
    }

    #[actix_web::test]
    async fn internal_errors_hide_storage_details() {
        let response = DomainError::Internal("disk I/O error".into()).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "internal server error");
        assert!(body.get("details").is_none());
    }
}
