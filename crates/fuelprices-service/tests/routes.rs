//! End-to-end route tests against an in-memory provider.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use fuelprices_lib::{Value, decode};
use fuelprices_service_shared::test_utils::{MockCall, MockProvider};
use fuelprices_service_shared::{AppState, PROBLEM_INVALID_REQUEST, PROBLEM_UPSTREAM_ERROR, WarmUp};

fn parse(text: &str) -> Value {
    decode::from_str(text).expect("fixture should decode")
}

fn server_with(provider: Arc<MockProvider>) -> TestServer {
    let state = AppState::new(provider, WarmUp::Skipped);
    TestServer::new(fuelprices_service::router(state, Some("/metrics"))).unwrap()
}

#[tokio::test]
async fn discovery_lists_endpoints() {
    let server = server_with(Arc::new(MockProvider::new()));

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({
            "status": "running",
            "endpoints": {
                "get_prices": "/get_prices",
                "search": "/search?query={query}&limit={limit}",
                "site": "/site/{site_id}",
                "stations-within-radius": "/stations-within-radius?lat={lat}&lng={lng}&radius={radius}"
            }
        })
    );
}

#[tokio::test]
async fn get_prices_returns_provider_data_verbatim() {
    let provider = Arc::new(MockProvider::new().with_prices(parse(
        r#"[{"site_id":"gb-002","price":151.9},{"site_id":"gb-001","price":149}]"#,
    )));
    let server = server_with(provider.clone());

    let response = server.get("/get_prices").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.text(),
        r#"{"data":[{"site_id":"gb-002","price":151.9},{"site_id":"gb-001","price":149}]}"#
    );
    assert_eq!(provider.calls(), vec![MockCall::FetchAllPrices]);
}

#[tokio::test]
async fn get_prices_with_non_finite_float_is_server_error() {
    let provider = Arc::new(
        MockProvider::new().with_prices(parse(r#"[{"site_id":"gb-001","price":NaN}]"#)),
    );
    let server = server_with(provider);

    let response = server.get("/get_prices").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn search_replaces_non_finite_floats_with_null() {
    let provider = Arc::new(MockProvider::new().with_search(parse(
        r#"[{"name":"Tesco Extra","price":NaN,"distance":Infinity,"tags":[-Infinity,1.5]}]"#,
    )));
    let server = server_with(provider.clone());

    let response = server
        .get("/search")
        .add_query_param("query", "tesco")
        .add_query_param("limit", 2)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.text(),
        r#"{"data":[{"name":"Tesco Extra","price":null,"distance":null,"tags":[null,1.5]}]}"#
    );
    assert_eq!(
        provider.calls(),
        vec![MockCall::Search {
            query: "tesco".to_string(),
            limit: Some(2)
        }]
    );
}

#[tokio::test]
async fn search_without_limit_forwards_none() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server.get("/search").add_query_param("query", "bp").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>(), json!({"data": []}));
    assert_eq!(
        provider.calls(),
        vec![MockCall::Search {
            query: "bp".to_string(),
            limit: None
        }]
    );
}

#[tokio::test]
async fn search_forwards_negative_limit() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server
        .get("/search")
        .add_query_param("query", "bp")
        .add_query_param("limit", -1)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        provider.calls(),
        vec![MockCall::Search {
            query: "bp".to_string(),
            limit: Some(-1)
        }]
    );
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server.get("/search").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let problem = response.json::<serde_json::Value>();
    assert_eq!(problem["type"], PROBLEM_INVALID_REQUEST);
    assert_eq!(problem["status"], 400);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn search_with_non_numeric_limit_is_bad_request() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server
        .get("/search")
        .add_query_param("query", "shell")
        .add_query_param("limit", "ten")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn site_wraps_station() {
    let provider = Arc::new(
        MockProvider::new().with_station(parse(r#"{"site_id":"gb-001","brand":"ASDA"}"#)),
    );
    let server = server_with(provider.clone());

    let response = server.get("/site/gb-001").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.text(),
        r#"{"station":{"site_id":"gb-001","brand":"ASDA"}}"#
    );
    assert_eq!(
        provider.calls(),
        vec![MockCall::StationById("gb-001".to_string())]
    );
}

#[tokio::test]
async fn site_with_non_finite_float_is_server_error() {
    let provider =
        Arc::new(MockProvider::new().with_station(parse(r#"{"site_id":"x","lat":-Infinity}"#)));
    let server = server_with(provider);

    let response = server.get("/site/x").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stations_within_radius_forwards_coordinates() {
    let provider = Arc::new(
        MockProvider::new().with_stations(parse(r#"[{"site_id":"gb-001"},{"site_id":"gb-007"}]"#)),
    );
    let server = server_with(provider.clone());

    let response = server
        .get("/stations-within-radius")
        .add_query_param("lat", 51.5074)
        .add_query_param("lng", -0.1278)
        .add_query_param("radius", 2.5)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"stations": [{"site_id": "gb-001"}, {"site_id": "gb-007"}]})
    );
    assert_eq!(
        provider.calls(),
        vec![MockCall::StationsWithinRadius {
            lat: 51.5074,
            lng: -0.1278,
            radius: 2.5
        }]
    );
}

#[tokio::test]
async fn stations_within_radius_requires_radius() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server
        .get("/stations-within-radius")
        .add_query_param("lat", 51.5)
        .add_query_param("lng", -0.12)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let problem = response.json::<serde_json::Value>();
    assert_eq!(problem["type"], PROBLEM_INVALID_REQUEST);
    assert!(problem["detail"].as_str().unwrap().contains("radius"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn stations_within_radius_forwards_non_finite_coordinates() {
    let provider = Arc::new(MockProvider::new());
    let server = server_with(provider.clone());

    let response = server
        .get("/stations-within-radius")
        .add_query_param("lat", "inf")
        .add_query_param("lng", "-inf")
        .add_query_param("radius", 1)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        provider.calls(),
        vec![MockCall::StationsWithinRadius {
            lat: f64::INFINITY,
            lng: f64::NEG_INFINITY,
            radius: 1.0
        }]
    );
}

#[tokio::test]
async fn upstream_failure_is_problem_details() {
    let provider = Arc::new(MockProvider::new().failing(502));
    let server = server_with(provider);

    let response = server.get("/search").add_query_param("query", "esso").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let problem = response.json::<serde_json::Value>();
    assert_eq!(problem["type"], PROBLEM_UPSTREAM_ERROR);
    assert_eq!(problem["status"], 500);
    assert_eq!(problem["instance"], request_id.as_str());
    let detail = problem["detail"].as_str().unwrap();
    assert!(detail.contains("502"));
    assert!(!detail.contains("mock://"));
}

#[tokio::test]
async fn upstream_not_found_is_not_special_cased() {
    let provider = Arc::new(MockProvider::new().failing(404));
    let server = server_with(provider);

    let response = server.get("/site/missing").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>()["type"],
        PROBLEM_UPSTREAM_ERROR
    );
}

#[tokio::test]
async fn health_endpoints_report_status() {
    let provider = Arc::new(MockProvider::new());
    let state = AppState::new(provider, WarmUp::Failed("upstream returned 503".to_string()));
    let server = TestServer::new(fuelprices_service::router(state, None)).unwrap();

    let live = server.get("/health/live").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    assert_eq!(live.json::<serde_json::Value>()["status"], "ok");

    let ready = server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    let body = ready.json::<serde_json::Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["upstream"], "mock://fuel-prices");
    assert_eq!(body["prices_warmed"], false);
}

#[tokio::test]
async fn metrics_route_follows_configuration() {
    let enabled = server_with(Arc::new(MockProvider::new()));
    assert_eq!(enabled.get("/metrics").await.status_code(), StatusCode::OK);

    let state = AppState::new(Arc::new(MockProvider::new()), WarmUp::Skipped);
    let disabled = TestServer::new(fuelprices_service::router(state, None)).unwrap();
    assert_eq!(
        disabled.get("/metrics").await.status_code(),
        StatusCode::NOT_FOUND
    );
}
