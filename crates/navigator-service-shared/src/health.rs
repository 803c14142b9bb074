//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// RFC 3339 time the probe was answered.
    pub timestamp: String,

    /// Number of road nodes available to the navigator (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_loaded: Option<usize>,
}

impl HealthStatus {
    fn with_status(status: String, service: &str, version: &str) -> Self {
        Self {
            status,
            service: service.to_string(),
            version: version.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            nodes_loaded: None,
        }
    }

    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self::with_status("ok".to_string(), service, version)
    }

    /// Create a ready status, optionally reporting the loaded node count.
    pub fn ready(service: &str, version: &str, nodes: Option<usize>) -> Self {
        Self {
            nodes_loaded: nodes,
            ..Self::with_status("ok".to_string(), service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self::with_status(format!("not_ready: {}", reason), service, version)
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"navigator-service-shared","version":"0.1.0","timestamp":"2026-01-05T10:00:00Z"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 503 when the state reports an empty road network. Capabilities
/// that do not report a node count are assumed ready.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if state.nodes_loaded() == Some(0) {
        let status = HealthStatus::not_ready(service, version, "no road nodes loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, state.nodes_loaded());
    (StatusCode::OK, Json(status)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SpyNavigator;

    #[test]
    fn test_health_status_alive() {
        let status = HealthStatus::alive("shortest-path", "1.0.0");
        assert_eq!(status.status, "ok");
        assert_eq!(status.service, "shortest-path");
        assert_eq!(status.version, "1.0.0");
        assert!(status.nodes_loaded.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&status.timestamp).is_ok());
    }

    #[test]
    fn test_health_status_not_ready() {
        let status = HealthStatus::not_ready("shortest-path", "1.0.0", "no data");
        assert!(status.status.starts_with("not_ready:"));
        assert!(status.status.contains("no data"));
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::alive("route", "0.1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("nodes_loaded"));

        let json = serde_json::to_string(&HealthStatus::ready("route", "0.1.0", Some(8))).unwrap();
        assert!(json.contains("\"nodes_loaded\":8"));
    }

    #[tokio::test]
    async fn test_ready_with_nodes() {
        let state = AppState::new(SpyNavigator::succeeding()).with_nodes_loaded(8);
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_with_empty_network() {
        let state = AppState::new(SpyNavigator::succeeding()).with_nodes_loaded(0);
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_without_node_count() {
        let state = AppState::new(SpyNavigator::succeeding());
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
