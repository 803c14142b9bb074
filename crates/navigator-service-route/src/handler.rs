//! `POST /api/navigations/shortestPath`.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::{error, info, warn};

use navigator_lib::NavigationContext;
use navigator_service_shared::{
    decode_request, record_path_computed, record_path_failed, render_json, ApiError, AppState,
    RequestId, ShortestPathRequest, ShortestPathResponse,
};

/// Client-facing text when either endpoint cannot be resolved.
pub const NODE_NOT_FOUND_MESSAGE: &str = "node not found";

/// Client-facing text for engine failures; the real cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Compute the shortest path and ETA between the two requested coordinates.
///
/// The body is decoded as JSON whatever its content type. Invalid input never
/// reaches the capability, which is called exactly once otherwise.
pub async fn shortest_path(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    body: Bytes,
) -> Response {
    let request_id = request_id
        .map(|Extension(id)| id)
        .unwrap_or_else(RequestId::generate);

    let request: ShortestPathRequest = match decode_request(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(request_id = %request_id, error = %err, "rejected shortest path request");
            record_path_failed("validation_error");
            return (*err).into_response();
        }
    };

    info!(
        request_id = %request_id,
        src_lat = request.src_lat,
        src_lon = request.src_lon,
        dst_lat = request.dst_lat,
        dst_lon = request.dst_lon,
        "handling shortest path request"
    );

    let ctx = NavigationContext::new(request_id.as_str());
    let outcome = state
        .navigator()
        .shortest_path_eta(&ctx, request.source(), request.destination())
        .await;

    match outcome {
        Ok(result) => {
            let body = ShortestPathResponse::from(result);
            let response = render_json(&body);
            if response.status() == StatusCode::OK {
                record_path_computed(body.distance, body.eta);
                info!(
                    request_id = %request_id,
                    path = %body.path,
                    distance = body.distance,
                    eta = body.eta,
                    "shortest path computed"
                );
            } else {
                record_path_failed("render_error");
            }
            response
        }
        Err(failure) if !failure.found => {
            info!(request_id = %request_id, error = %failure.error, "endpoint not resolvable");
            record_path_failed("node_not_found");
            ApiError::invalid_request(NODE_NOT_FOUND_MESSAGE).into_response()
        }
        Err(failure) => {
            error!(request_id = %request_id, error = %failure.error, "shortest path computation failed");
            record_path_failed("internal_error");
            ApiError::internal_server_error(INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}
