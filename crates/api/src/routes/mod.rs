pub mod events;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod users;

use axum::Json;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// Body of the `can-delete` endpoints.
#[derive(Serialize)]
pub struct CanDeleteResponse {
    pub can_delete: bool,
}

/// Parses an integer path segment into a typed id.
pub(crate) fn parse_id<T: From<i32>>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<i32>()
        .map(T::from)
        .map_err(|e| ApiError::BadRequest(format!("Invalid id '{raw}': {e}")))
}

/// 201 response carrying the stored entity and its location.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body)).into_response()
}
