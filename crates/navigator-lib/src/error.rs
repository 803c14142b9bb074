use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::NodeId;

/// Convenient result alias for the navigator library.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of categorical failure kinds, independent of any transport.
///
/// HTTP layers translate these into status codes; the library never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InternalServerError,
    NotFound,
    Conflict,
    BadParamInput,
    Unauthorized,
    Unavailable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ErrorCode::InternalServerError => "internal_server_error",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::BadParamInput => "bad_param_input",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Unavailable => "unavailable",
        };
        f.write_str(value)
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Road network file could not be located at the resolved path.
    #[error("road network not found at {path}")]
    NetworkNotFound { path: PathBuf },

    /// Road network file parsed but is structurally unusable.
    #[error("invalid road network: {message}")]
    InvalidNetwork { message: String },

    /// Two nodes in the road network share an identifier.
    #[error("duplicate node id {id} in road network")]
    DuplicateNode { id: NodeId },

    /// Raised when a latitude/longitude pair is outside the valid range.
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// No road node lies close enough to the requested coordinate.
    #[error("no road node within {max_distance}m of ({latitude}, {longitude})")]
    NodeNotFound {
        latitude: f64,
        longitude: f64,
        max_distance: f64,
    },

    /// Both endpoints resolved but the graph does not connect them.
    #[error("no route found between node {start} and node {goal}")]
    RouteNotFound { start: NodeId, goal: NodeId },

    /// The caller went away before the search finished.
    #[error("navigation request was cancelled")]
    Cancelled,

    /// The engine failed for reasons unrelated to the input.
    #[error("navigation engine failure: {message}")]
    Engine { message: String },

    /// Error raised by another capability implementation carrying its own code.
    #[error("{message}")]
    Domain { code: ErrorCode, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an error carrying an explicit domain code.
    pub fn domain(code: ErrorCode, message: impl Into<String>) -> Self {
        Error::Domain {
            code,
            message: message.into(),
        }
    }

    /// Domain code carried by this error, if it has one.
    ///
    /// Errors without a code (IO, cancellation, engine crashes) are treated as
    /// unclassified by the transport layer.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::NetworkNotFound { .. } => Some(ErrorCode::Unavailable),
            Error::InvalidNetwork { .. } => Some(ErrorCode::InternalServerError),
            Error::DuplicateNode { .. } => Some(ErrorCode::Conflict),
            Error::InvalidCoordinate { .. } => Some(ErrorCode::BadParamInput),
            Error::NodeNotFound { .. } | Error::RouteNotFound { .. } => Some(ErrorCode::NotFound),
            Error::Domain { code, .. } => Some(*code),
            Error::Cancelled | Error::Engine { .. } | Error::Io(_) | Error::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_carry_not_found() {
        let err = Error::NodeNotFound {
            latitude: -6.2,
            longitude: 106.8,
            max_distance: 500.0,
        };
        assert_eq!(err.code(), Some(ErrorCode::NotFound));

        let err = Error::RouteNotFound { start: 1, goal: 2 };
        assert_eq!(err.code(), Some(ErrorCode::NotFound));
    }

    #[test]
    fn runtime_failures_are_unclassified() {
        assert_eq!(Error::Cancelled.code(), None);
        let err = Error::Engine {
            message: "worker panicked".to_string(),
        };
        assert_eq!(err.code(), None);
    }

    #[test]
    fn domain_error_keeps_code_and_message() {
        let err = Error::domain(ErrorCode::Conflict, "already exists");
        assert_eq!(err.code(), Some(ErrorCode::Conflict));
        assert_eq!(err.to_string(), "already exists");
    }

    #[test]
    fn error_code_display_is_snake_case() {
        assert_eq!(ErrorCode::BadParamInput.to_string(), "bad_param_input");
        assert_eq!(
            serde_json::to_string(&ErrorCode::NotFound).unwrap(),
            "\"not_found\""
        );
    }
}
