//! Success response bodies.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use navigator_lib::{round_float, NavigationStep, PathResult};

use crate::ApiError;

/// Decimal digits kept for distance and ETA on the wire.
pub const RESPONSE_PRECISION: u32 = 2;

/// Body returned by `POST /api/navigations/shortestPath`.
///
/// The route geometry carried by [`PathResult`] is intentionally absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPathResponse {
    pub path: String,
    /// Meters, rounded to two decimals.
    pub distance: f64,
    /// Seconds, rounded to two decimals.
    #[serde(rename = "ETA")]
    pub eta: f64,
    pub navigations: Vec<NavigationStep>,
    pub found: bool,
}

impl From<PathResult> for ShortestPathResponse {
    fn from(result: PathResult) -> Self {
        Self {
            path: result.path,
            distance: round_float(result.distance, RESPONSE_PRECISION),
            eta: round_float(result.eta, RESPONSE_PRECISION),
            navigations: result.steps,
            found: result.found,
        }
    }
}

/// Serialize `body` as a `200 OK` JSON response.
///
/// A body that fails to serialize becomes `422` instead.
pub fn render_json<T: Serialize>(body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render response body");
            ApiError::render_error(err).into_response()
        }
    }
}
