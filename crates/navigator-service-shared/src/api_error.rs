//! Error responses for the navigator HTTP APIs.
//!
//! Every failure crosses the wire as the same small JSON document:
//!
//! ```json
//! {"status": "Invalid request.", "code": 1001, "error": "invalid request"}
//! ```
//!
//! `code` and `error` are omitted when unset. The HTTP status itself is not
//! part of the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use navigator_lib::{Error as LibError, ErrorCode};

/// Status text for malformed or unresolvable requests.
pub const STATUS_INVALID_REQUEST: &str = "Invalid request.";

/// Status text for failures the client cannot fix.
pub const STATUS_INTERNAL_ERROR: &str = "Internal server error.";

/// Status text for failures while rendering a response body.
pub const STATUS_RENDER_ERROR: &str = "Error rendering response.";

/// Status text for requests cut off by the deadline layer.
pub const STATUS_TIMEOUT: &str = "Request timed out.";

/// Error response body plus the HTTP status it is sent with.
///
/// # Example
///
/// ```
/// use navigator_service_shared::ApiError;
/// use axum::http::StatusCode;
///
/// let err = ApiError::invalid_request("invalid request");
/// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(
///     serde_json::to_string(&err).unwrap(),
///     r#"{"status":"Invalid request.","error":"invalid request"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code; carried out of band, never serialized.
    #[serde(skip)]
    pub http_status: u16,

    /// User-level status message.
    #[serde(rename = "status")]
    pub status_text: String,

    /// Application-specific error code.
    #[serde(rename = "code", skip_serializing_if = "Option::is_none")]
    pub app_code: Option<i64>,

    /// Application-level error message.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

impl ApiError {
    /// Create an error with a status and status text only.
    pub fn new(status: StatusCode, status_text: impl Into<String>) -> Self {
        Self {
            http_status: status.as_u16(),
            status_text: status_text.into(),
            app_code: None,
            error_text: None,
        }
    }

    /// Attach an application-specific error code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.app_code = Some(code);
        self
    }

    /// Attach an application-level error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error_text = Some(error.into());
        self
    }

    /// HTTP status this error is sent with.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// 400 for undecodable or invalid input.
    pub fn invalid_request(error: impl ToString) -> Self {
        Self::new(StatusCode::BAD_REQUEST, STATUS_INVALID_REQUEST).with_error(error.to_string())
    }

    /// 500 for failures on our side.
    ///
    /// Callers pass a fixed, client-safe message; internal detail belongs in
    /// the logs.
    pub fn internal_server_error(error: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, STATUS_INTERNAL_ERROR)
            .with_error(error.to_string())
    }

    /// 422 when the success body could not be rendered.
    pub fn render_error(error: impl ToString) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, STATUS_RENDER_ERROR)
            .with_error(error.to_string())
    }

    /// 408 for requests that exceeded the configured deadline.
    pub fn timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, STATUS_TIMEOUT)
    }

    /// Build a response for any library error using its domain code.
    pub fn from_domain_error(error: &LibError) -> Self {
        let (status, text) = map_domain_error_to_status(Some(error));
        Self::new(status, text).with_error(error.to_string())
    }
}

/// Classify a domain error into an HTTP status and status text.
///
/// Pure function usable by any handler. `None` means success.
pub fn map_domain_error_to_status(error: Option<&LibError>) -> (StatusCode, &'static str) {
    let Some(error) = error else {
        return (StatusCode::OK, "OK.");
    };

    match error.code() {
        None | Some(ErrorCode::InternalServerError) => {
            (StatusCode::INTERNAL_SERVER_ERROR, STATUS_INTERNAL_ERROR)
        }
        Some(ErrorCode::NotFound) => (StatusCode::NOT_FOUND, "Resource not found."),
        Some(ErrorCode::Conflict) => (StatusCode::CONFLICT, "Resource conflict."),
        Some(ErrorCode::BadParamInput) => (StatusCode::BAD_REQUEST, "Bad request."),
        Some(ErrorCode::Unauthorized) | Some(ErrorCode::Unavailable) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error.")
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.status_text,
            self.error_text.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}
