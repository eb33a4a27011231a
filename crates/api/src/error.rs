//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Domain logic error.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Domain(DomainError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let not_found = ApiError::from(DomainError::not_found("Order", 4));
        let conflict = ApiError::from(DomainError::conflict("blocked"));
        let bad = ApiError::BadRequest("invalid id".to_string());

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_message_is_passed_through() {
        let err = ApiError::from(DomainError::conflict("Deletion blocked: FG001"));
        assert_eq!(err.to_string(), "Deletion blocked: FG001");
    }
}
