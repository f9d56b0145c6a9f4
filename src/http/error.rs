//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// API error response body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
///
/// Validation errors and missing resources carry a client-facing message.
/// Storage failures are logged with full detail but always reach the client
/// as a generic `Internal Server Error` body.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (bad id, missing fields, client-supplied identifiers)
    BadRequest(String),
    /// Resource not found
    NotFound(String),
    /// Internal server error
    Internal(String),
    /// Repository/storage failure
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal Server Error"),
                )
            }
            AppError::Repository(err) => {
                // Query text and driver detail stay in the log.
                tracing::error!("repository failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal Server Error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        assert_eq!(
            status_of(AppError::BadRequest("film_id must be a number".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(AppError::NotFound("Film not found".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_storage_failures_map_to_500() {
        assert_eq!(
            status_of(AppError::Repository(RepositoryError::query("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Internal("join error".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
