//! HTTP API server for the catalog and orders service.
//!
//! Provides REST endpoints for products, users, orders and events, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    cors: CorsLayer,
) -> Router {
    use routes::{events, orders, products, users};

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        // Products
        .route(
            "/api/products",
            get(products::list::<S>).post(products::create::<S>),
        )
        .route(
            "/api/products/{code}",
            get(products::get::<S>)
                .put(products::update::<S>)
                .delete(products::delete::<S>),
        )
        .route(
            "/api/products/{code}/can-delete",
            get(products::can_delete::<S>),
        )
        .route(
            "/api/products/category/{category}",
            get(products::by_category::<S>),
        )
        .route(
            "/api/products/manufacturer/{name}",
            get(products::by_manufacturer::<S>),
        )
        .route("/api/products/brand/{brand}", get(products::by_brand::<S>))
        .route("/api/products/price", get(products::by_price::<S>))
        .route("/api/products/search", get(products::by_name::<S>))
        // Users
        .route("/api/users", get(users::list::<S>).post(users::create::<S>))
        .route(
            "/api/users/{id}",
            get(users::get::<S>)
                .put(users::update::<S>)
                .delete(users::delete::<S>),
        )
        .route("/api/users/{id}/can-delete", get(users::can_delete::<S>))
        // Orders
        .route(
            "/api/orders",
            get(orders::list::<S>).post(orders::create::<S>),
        )
        .route(
            "/api/orders/{id}",
            get(orders::get::<S>)
                .put(orders::update::<S>)
                .delete(orders::delete::<S>),
        )
        .route(
            "/api/orders/{id}/status",
            patch(orders::update_status::<S>),
        )
        .route(
            "/api/orders/customer/{user_id}",
            get(orders::by_customer::<S>),
        )
        // Events
        .route(
            "/api/events",
            get(events::list::<S>).post(events::create::<S>),
        )
        .route(
            "/api/events/{id}",
            get(events::get::<S>)
                .put(events::update::<S>)
                .delete(events::delete::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Builds the CORS policy for the configured origins.
///
/// Origins that are not valid header values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([header::LOCATION])
        .max_age(Duration::from_secs(3600))
}

/// Creates the application state over the given store.
pub fn create_state<S: Store>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
