//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use common::ProductCode;
use domain::DomainError;
use serde::Deserialize;
use store::{Product, ProductQuery, Store};

use super::{CanDeleteResponse, created};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Deserialize)]
pub struct NameSearch {
    pub name: String,
}

/// POST /api/products
///
/// Create or overwrite a product by code.
#[tracing::instrument(skip(state, product))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(product): Json<Product>,
) -> Result<Response, ApiError> {
    let product = state.products.create(product).await?;
    Ok(created(format!("/api/products/{}", product.code), product))
}

/// GET /api/products
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list().await?))
}

/// GET /api/products/{code}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let code = ProductCode::new(code);
    let product = state
        .products
        .get(&code)
        .await?
        .ok_or_else(|| DomainError::not_found("Product", &code))?;
    Ok(Json(product))
}

/// PUT /api/products/{code}
#[tracing::instrument(skip(state, product))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
    Json(product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    let code = ProductCode::new(code);
    Ok(Json(state.products.update(&code, product).await?))
}

/// DELETE /api/products/{code}
///
/// Refused while an active order contains it.
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.products.delete(&ProductCode::new(code)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/products/{code}/can-delete
#[tracing::instrument(skip(state))]
pub async fn can_delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<Json<CanDeleteResponse>, ApiError> {
    let can_delete = state.products.can_delete(&ProductCode::new(code)).await?;
    Ok(Json(CanDeleteResponse { can_delete }))
}

/// GET /api/products/category/{category}
#[tracing::instrument(skip(state))]
pub async fn by_category<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    search(&state, ProductQuery::for_category(category)).await
}

/// GET /api/products/manufacturer/{name}
#[tracing::instrument(skip(state))]
pub async fn by_manufacturer<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    search(&state, ProductQuery::new().manufacturer(name)).await
}

/// GET /api/products/brand/{brand}
#[tracing::instrument(skip(state))]
pub async fn by_brand<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(brand): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    search(&state, ProductQuery::new().brand(brand)).await
}

/// GET /api/products/price?min=&max=
#[tracing::instrument(skip(state))]
pub async fn by_price<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(range): Query<PriceRange>,
) -> Result<Json<Vec<Product>>, ApiError> {
    if range.min > range.max {
        return Err(ApiError::BadRequest(format!(
            "min ({}) must not exceed max ({})",
            range.min, range.max
        )));
    }
    search(&state, ProductQuery::for_price_range(range.min, range.max)).await
}

/// GET /api/products/search?name=
///
/// Case-insensitive name fragment.
#[tracing::instrument(skip(state))]
pub async fn by_name<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(search_params): Query<NameSearch>,
) -> Result<Json<Vec<Product>>, ApiError> {
    search(&state, ProductQuery::new().name_contains(search_params.name)).await
}

async fn search<S: Store>(
    state: &AppState<S>,
    query: ProductQuery,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.search(query).await?))
}
