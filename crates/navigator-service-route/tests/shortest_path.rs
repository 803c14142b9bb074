//! HTTP tests for `POST /api/navigations/shortestPath`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use navigator_lib::{
    CancelToken, Coordinate, ErrorCode, NavigationContext, NavigationFailure, PathResult,
    ShortestPathEta,
};
use navigator_service_route::{build_router, SHORTEST_PATH_ROUTE};
use navigator_service_shared::test_utils::{fixture_state, sample_path_result, SpyNavigator};
use navigator_service_shared::{AppState, MetricsConfig, ServiceConfig};

fn server_for(state: AppState) -> TestServer {
    let app = build_router(state, &ServiceConfig::default(), &MetricsConfig::default());
    TestServer::new(app).unwrap()
}

fn spy_server(spy: SpyNavigator) -> (TestServer, Arc<SpyNavigator>) {
    let spy = Arc::new(spy);
    let state = AppState::from_arc(spy.clone() as Arc<dyn ShortestPathEta>);
    (server_for(state), spy)
}

fn jakarta_to_bandung() -> Value {
    json!({"src_lat": -6.2, "src_lon": 106.8, "dst_lat": -6.9, "dst_lon": 107.6})
}

#[tokio::test]
async fn success_returns_rounded_path() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["path"], "A->B->C");
    assert_eq!(body["distance"], 15321.46);
    assert_eq!(body["ETA"], 842.9);
    assert_eq!(body["found"], true);
    assert_eq!(body["navigations"].as_array().unwrap().len(), 2);
    assert_eq!(spy.calls(), 1);

    let call = spy.last_call().unwrap();
    assert_eq!(call.source, Coordinate::new(-6.2, 106.8));
    assert_eq!(call.destination, Coordinate::new(-6.9, 107.6));
}

#[tokio::test]
async fn success_body_has_exact_shape() {
    let result = PathResult {
        distance: 15321.4,
        eta: 842.9,
        ..sample_path_result()
    };
    let (server, _) = spy_server(SpyNavigator::returning(result));

    let body: Value = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await
        .json();

    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["ETA", "distance", "found", "navigations", "path"]);
    assert_eq!(body["distance"], 15321.4);
    assert_eq!(body["ETA"], 842.9);
    assert!(body.get("route").is_none());
}

#[tokio::test]
async fn zero_coordinate_is_rejected_without_calling_capability() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    for field in ["src_lat", "src_lon", "dst_lat", "dst_lon"] {
        let mut body = jakarta_to_bandung();
        body[field] = json!(0);

        let response = server.post(SHORTEST_PATH_ROUTE).json(&body).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "field {field}");
        assert_eq!(
            response.json::<Value>(),
            json!({"status": "Invalid request.", "error": "invalid request"})
        );
    }
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn missing_field_is_rejected() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&json!({"src_lat": -6.2, "src_lon": 106.8, "dst_lat": -6.9}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server.post(SHORTEST_PATH_ROUTE).text("{not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "Invalid request.");
    assert!(body["error"].is_string());
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn body_without_json_content_type_is_accepted() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .text(jakarta_to_bandung().to_string())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn unresolvable_endpoint_is_bad_request() {
    let (server, spy) = spy_server(SpyNavigator::failing(
        false,
        Some(ErrorCode::NotFound),
        "no road node near source",
    ));

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Invalid request.", "error": "node not found"})
    );
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn engine_failure_is_internal_error_without_detail() {
    let secret = "connection refused to graph shard 7";
    let (server, spy) = spy_server(SpyNavigator::failing(true, None, secret));

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains(secret));
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Internal server error.", "error": "internal server error"})
    );
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn found_flag_decides_status_regardless_of_code() {
    let (server, _) = spy_server(SpyNavigator::failing(
        true,
        Some(ErrorCode::NotFound),
        "not found, but resolved",
    ));

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn request_id_is_echoed_and_passed_to_capability() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("nav-test-42"),
        )
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.header("x-request-id"), "nav-test-42");
    assert_eq!(spy.last_call().unwrap().request_id, "nav-test-42");
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let (server, spy) = spy_server(SpyNavigator::succeeding());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    let header = response.header("x-request-id");
    let generated = header.to_str().unwrap();
    assert_eq!(generated.len(), 36);
    assert_eq!(spy.last_call().unwrap().request_id, generated);
}

/// Never finishes; keeps the token it was handed so the test can inspect it.
#[derive(Default)]
struct StalledNavigator {
    token: Mutex<Option<CancelToken>>,
}

#[async_trait]
impl ShortestPathEta for StalledNavigator {
    async fn shortest_path_eta(
        &self,
        ctx: &NavigationContext,
        _source: Coordinate,
        _destination: Coordinate,
    ) -> Result<PathResult, NavigationFailure> {
        *self.token.lock().unwrap() = Some(ctx.cancel_token());
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(sample_path_result())
    }
}

#[tokio::test]
async fn deadline_returns_timeout_and_cancels_navigation() {
    let navigator = Arc::new(StalledNavigator::default());
    let state = AppState::from_arc(navigator.clone() as Arc<dyn ShortestPathEta>);
    let config = ServiceConfig {
        request_timeout_secs: 1,
        ..ServiceConfig::default()
    };
    let server =
        TestServer::new(build_router(state, &config, &MetricsConfig::default())).unwrap();

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&jakarta_to_bandung())
        .await;

    assert_eq!(response.status_code(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Request timed out."})
    );
    let token = navigator.token.lock().unwrap().clone().unwrap();
    assert!(token.is_cancelled());
}

// =============================================================================
// End-to-end against the fixture road network
// =============================================================================

#[tokio::test]
async fn fixture_route_between_connected_nodes() {
    let server = server_for(fixture_state());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&json!({"src_lat": -6.2, "src_lon": 106.8, "dst_lat": -6.21, "dst_lon": 106.82}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["path"], "1->5->4");
    assert_eq!(body["found"], true);

    let distance = body["distance"].as_f64().unwrap();
    assert!((2600.0..2750.0).contains(&distance), "distance {distance}");
    let eta = body["ETA"].as_f64().unwrap();
    assert!(eta > 0.0);

    let steps = body["navigations"].as_array().unwrap();
    assert_eq!(steps.first().unwrap()["maneuver"], "depart");
    assert_eq!(steps.last().unwrap()["maneuver"], "arrive");
}

#[tokio::test]
async fn fixture_far_coordinate_is_node_not_found() {
    let server = server_for(fixture_state());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&json!({"src_lat": 10.0, "src_lon": 10.0, "dst_lat": -6.21, "dst_lon": 106.82}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "node not found");
}

#[tokio::test]
async fn fixture_disconnected_nodes_are_node_not_found() {
    let server = server_for(fixture_state());

    let response = server
        .post(SHORTEST_PATH_ROUTE)
        .json(&json!({"src_lat": -6.2, "src_lon": 106.8, "dst_lat": -6.3, "dst_lon": 106.9}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "node not found");
}
