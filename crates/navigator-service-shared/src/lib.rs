//! Shared infrastructure for the navigator HTTP services.
//!
//! - [`AppState`]: The injected shortest-path capability
//! - [`health`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ApiError`]: Error body plus the domain-error classifier
//! - [`ShortestPathResponse`] and [`render_json`]: Success bodies
//! - [`config`]: Environment-driven service configuration
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID and HTTP metrics middleware
//!
//! # Architecture
//!
//! Handlers are thin. Path finding lives in `navigator-lib` behind the
//! `ShortestPathEta` trait; this crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Decode request JSON                                      │
//! │  - Validate coordinates                                     │
//! │  - Call the ShortestPathEta capability                      │
//! │  - Render response or ApiError                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! Enable the `test-utils` feature to access [`test_utils`] from dependent
//! crates.

#![deny(warnings)]

mod api_error;
pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api_error::{
    map_domain_error_to_status, ApiError, STATUS_INTERNAL_ERROR, STATUS_INVALID_REQUEST,
    STATUS_RENDER_ERROR, STATUS_TIMEOUT,
};
pub use config::ServiceConfig;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_path_computed, record_path_failed, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use request::{decode_request, ShortestPathRequest, Validate, INVALID_REQUEST_MESSAGE};
pub use response::{render_json, ShortestPathResponse, RESPONSE_PRECISION};
pub use state::AppState;
