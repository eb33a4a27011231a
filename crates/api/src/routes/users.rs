//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use common::UserId;
use domain::DomainError;
use store::{Store, User};

use super::{CanDeleteResponse, created, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/users
///
/// Any client-supplied id is ignored.
#[tracing::instrument(skip(state, user))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(user): Json<User>,
) -> Result<Response, ApiError> {
    let user = state.users.create(user).await?;
    let location = user
        .id
        .map(|id| format!("/api/users/{id}"))
        .unwrap_or_default();
    Ok(created(location, user))
}

/// GET /api/users
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

/// GET /api/users/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&id)?;
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))?;
    Ok(Json(user))
}

/// PUT /api/users/{id}
#[tracing::instrument(skip(state, user))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&id)?;
    Ok(Json(state.users.update(id, user).await?))
}

/// DELETE /api/users/{id}
///
/// Refused while the user has active orders.
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/can-delete
#[tracing::instrument(skip(state))]
pub async fn can_delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CanDeleteResponse>, ApiError> {
    let can_delete = state.users.can_delete(parse_id(&id)?).await?;
    Ok(Json(CanDeleteResponse { can_delete }))
}
