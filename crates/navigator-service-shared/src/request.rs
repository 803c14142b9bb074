//! Request types and validation for HTTP endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use navigator_lib::Coordinate;

use crate::ApiError;

/// Message returned when a shortest-path query has an unset coordinate.
pub const INVALID_REQUEST_MESSAGE: &str = "invalid request";

/// Validation trait for request types.
///
/// Returns a boxed `ApiError` to avoid large `Result::Err` variants.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    fn validate(&self) -> Result<(), Box<ApiError>>;
}

/// Decode a JSON request body and validate it.
///
/// Bodies are decoded regardless of `Content-Type`. Both decode and
/// validation failures become `400 Invalid request.`.
pub fn decode_request<T>(body: &[u8]) -> Result<T, Box<ApiError>>
where
    T: DeserializeOwned + Validate,
{
    let request: T = serde_json::from_slice(body)
        .map_err(|e| Box::new(ApiError::invalid_request(e)))?;
    request.validate()?;
    Ok(request)
}

/// Query for the shortest path between two coordinates.
///
/// Missing fields decode as `0.0`; zero is treated as "unset" and rejected by
/// validation rather than accepted as the equator or prime meridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    #[serde(default)]
    pub src_lat: f64,
    #[serde(default)]
    pub src_lon: f64,
    #[serde(default)]
    pub dst_lat: f64,
    #[serde(default)]
    pub dst_lon: f64,
}

impl ShortestPathRequest {
    pub fn source(&self) -> Coordinate {
        Coordinate::new(self.src_lat, self.src_lon)
    }

    pub fn destination(&self) -> Coordinate {
        Coordinate::new(self.dst_lat, self.dst_lon)
    }
}

impl Validate for ShortestPathRequest {
    fn validate(&self) -> Result<(), Box<ApiError>> {
        let unset = [self.src_lat, self.src_lon, self.dst_lat, self.dst_lon]
            .iter()
            .any(|value| *value == 0.0);
        if unset {
            return Err(Box::new(ApiError::invalid_request(INVALID_REQUEST_MESSAGE)));
        }
        Ok(())
    }
}
