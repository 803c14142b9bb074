//! Shortest-path and ETA HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /api/navigations/shortestPath` - Shortest path and ETA between two coordinates
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

#![deny(warnings)]

pub mod handler;

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    BoxError, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use navigator_service_shared::{
    health_live, health_ready, metrics_handler, ApiError, AppState, MetricsConfig, MetricsLayer,
    ServiceConfig,
};

/// Route of the shortest-path endpoint.
pub const SHORTEST_PATH_ROUTE: &str = "/api/navigations/shortestPath";

/// Build the full router with all routes and middleware.
///
/// The deadline from `config` wraps every route; expired requests are
/// answered with `408` and their handler future is dropped, which cancels the
/// in-flight navigation.
pub fn build_router(state: AppState, config: &ServiceConfig, metrics: &MetricsConfig) -> Router {
    let deadline = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_deadline_error))
        .timeout(config.request_timeout());

    Router::new()
        .route(SHORTEST_PATH_ROUTE, post(handler::shortest_path))
        .route(&metrics.path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(deadline)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn handle_deadline_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request exceeded deadline");
        ApiError::timeout()
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        ApiError::internal_server_error("internal server error")
    }
}
