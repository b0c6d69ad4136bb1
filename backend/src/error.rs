//! API error type and its JSON rendering.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::RepositoryError;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Message shown to the client.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub code: u16,
}

/// Every way a handler can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Admin header missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,
    /// Invalid input; the message is shown as is.
    #[error("{0}")]
    BadRequest(String),
    /// Unknown article or path.
    #[error("{0}")]
    NotFound(String),
    /// Known path, unsupported method.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// A dependency such as the mailer is not configured.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Details are logged when the error is built; clients only see
    /// `message`.
    #[error("{message}")]
    Internal {
        /// Generic client-facing message.
        message: &'static str,
    },
}

impl ApiError {
    /// Logs `err` and returns an opaque 500.
    pub fn internal(message: &'static str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", message, err);
        ApiError::Internal {
            message,
        }
    }

    /// 404 for a missing article.
    pub fn article_not_found() -> Self {
        ApiError::NotFound("Article not found".to_string())
    }

    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::article_not_found(),
            RepositoryError::Validation(err) => ApiError::BadRequest(err.to_string()),
            other => ApiError::internal("Article storage failure", other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use blog_shared::ValidationError;

    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        assert_eq!(ApiError::from(RepositoryError::NotFound(9)).status(), StatusCode::NOT_FOUND);
        let validation = ApiError::from(RepositoryError::Validation(ValidationError {
            field: "title",
        }));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "`title` is required");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::internal("Failed to list articles", "disk I/O error at page 7");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to list articles");
    }
}
