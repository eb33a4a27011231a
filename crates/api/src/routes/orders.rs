//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use common::{OrderId, UserId};
use domain::{DomainError, Order};
use serde::Deserialize;
use store::Store;

use super::{created, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// -- Handlers --

/// POST /api/orders
///
/// The total is computed server-side.
#[tracing::instrument(skip(state, order))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(order): Json<Order>,
) -> Result<Response, ApiError> {
    let order = state.orders.create(order).await?;
    let location = order
        .id
        .map(|id| format!("/api/orders/{id}"))
        .unwrap_or_default();
    Ok(created(location, order))
}

/// GET /api/orders
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list().await?))
}

/// GET /api/orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    let order = state
        .orders
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Order", id))?;
    Ok(Json(order))
}

/// GET /api/orders/customer/{user_id}
#[tracing::instrument(skip(state))]
pub async fn by_customer<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let customer_id: UserId = parse_id(&user_id)?;
    Ok(Json(state.orders.list_by_customer(customer_id).await?))
}

/// PUT /api/orders/{id}
///
/// Replaces the order and recomputes its total.
#[tracing::instrument(skip(state, order))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(order): Json<Order>,
) -> Result<Json<Order>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(state.orders.update(id, order).await?))
}

/// PATCH /api/orders/{id}/status
///
/// Leaves line items and total untouched.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, ApiError> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(state.orders.update_status(id, req.status).await?))
}

/// DELETE /api/orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
