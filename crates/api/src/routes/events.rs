//! Catalog event endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use common::EventId;
use domain::DomainError;
use store::{Event, Store};

use super::{created, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/events
#[tracing::instrument(skip(state, event))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(event): Json<Event>,
) -> Result<Response, ApiError> {
    let event = state.events.create(event).await?;
    let location = event
        .id
        .map(|id| format!("/api/events/{id}"))
        .unwrap_or_default();
    Ok(created(location, event))
}

/// GET /api/events
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.events.list().await?))
}

/// GET /api/events/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id: EventId = parse_id(&id)?;
    let event = state
        .events
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Event", id))?;
    Ok(Json(event))
}

/// PUT /api/events/{id}
#[tracing::instrument(skip(state, event))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(event): Json<Event>,
) -> Result<Json<Event>, ApiError> {
    let id: EventId = parse_id(&id)?;
    Ok(Json(state.events.update(id, event).await?))
}

/// DELETE /api/events/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.events.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
