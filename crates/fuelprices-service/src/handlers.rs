//! Route handlers.
//!
//! Each handler makes exactly one provider call. Only `/search` sanitizes the
//! provider result; the other routes return it as received, so a tree holding
//! NaN or an infinity fails to serialize and the client gets a plain 500.

use std::future::Future;
use std::time::Instant;

use axum::{
    extract::{
        Path, Query, State,
        rejection::QueryRejection,
    },
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use fuelprices_lib::{Operation, Result as LibResult, Value, count_non_finite, sanitize};
use fuelprices_service_shared::{
    AppState, DataResponse, DiscoveryResponse, ProblemDetails, RadiusQuery, RequestId,
    SearchQuery, StationResponse, StationsResponse, from_lib_error,
    record_non_finite_replaced, record_upstream_call,
};

/// `GET /`
pub async fn discovery() -> DiscoveryResponse {
    DiscoveryResponse::running()
}

/// `GET /get_prices`
pub async fn get_prices(State(state): State<AppState>, request_id: RequestId) -> Response {
    let provider = state.provider();
    match call_upstream(Operation::FetchAllPrices, provider.fetch_all_prices()).await {
        Ok(prices) => {
            warn_if_unserializable(Operation::FetchAllPrices, &prices, &request_id);
            DataResponse::new(prices).into_response()
        }
        Err(e) => upstream_failure(&e, &request_id),
    }
}

/// `GET /search?query=...&limit=...`
pub async fn search(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return invalid_query(&rejection, &request_id),
    };

    let provider = state.provider();
    let results = match call_upstream(
        Operation::Search,
        provider.search(&params.query, params.limit),
    )
    .await
    {
        Ok(results) => results,
        Err(e) => return upstream_failure(&e, &request_id),
    };

    let replaced = count_non_finite(&results);
    record_non_finite_replaced(replaced);
    if replaced > 0 {
        debug!(request_id = %request_id, replaced, "replaced non-finite floats in search results");
    }

    DataResponse::new(sanitize(&results)).into_response()
}

/// `GET /site/{site_id}`
pub async fn site(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(site_id): Path<String>,
) -> Response {
    let provider = state.provider();
    match call_upstream(Operation::StationById, provider.station_by_id(&site_id)).await {
        Ok(station) => {
            warn_if_unserializable(Operation::StationById, &station, &request_id);
            StationResponse::new(station).into_response()
        }
        Err(e) => upstream_failure(&e, &request_id),
    }
}

/// `GET /stations-within-radius?lat=...&lng=...&radius=...`
pub async fn stations_within_radius(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<RadiusQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return invalid_query(&rejection, &request_id),
    };

    let provider = state.provider();
    match call_upstream(
        Operation::StationsWithinRadius,
        provider.stations_within_radius(params.lat, params.lng, params.radius),
    )
    .await
    {
        Ok(stations) => {
            warn_if_unserializable(Operation::StationsWithinRadius, &stations, &request_id);
            StationsResponse::new(stations).into_response()
        }
        Err(e) => upstream_failure(&e, &request_id),
    }
}

/// Await a provider call, recording its latency and outcome.
async fn call_upstream<F>(operation: Operation, call: F) -> LibResult<Value>
where
    F: Future<Output = LibResult<Value>>,
{
    let start = Instant::now();
    let result = call.await;
    let elapsed = start.elapsed();

    record_upstream_call(operation, result.is_ok(), elapsed);
    info!(
        operation = %operation,
        success = result.is_ok(),
        latency_ms = elapsed.as_secs_f64() * 1000.0,
        "upstream call finished"
    );

    result
}

fn upstream_failure(error: &fuelprices_lib::Error, request_id: &RequestId) -> Response {
    if let fuelprices_lib::Error::InvalidSiteId { site_id } = error {
        warn!(request_id = %request_id, site_id = %site_id, "rejected site id");
    } else {
        error!(request_id = %request_id, error = %error, "upstream provider call failed");
    }
    from_lib_error(error, request_id.as_str()).into_response()
}

fn invalid_query(rejection: &QueryRejection, request_id: &RequestId) -> Response {
    debug!(request_id = %request_id, rejection = %rejection, "rejected query string");
    ProblemDetails::bad_request(rejection.body_text(), request_id.as_str()).into_response()
}

fn warn_if_unserializable(operation: Operation, value: &Value, request_id: &RequestId) {
    if !value.is_json_safe() {
        warn!(
            request_id = %request_id,
            operation = %operation,
            non_finite = count_non_finite(value),
            "upstream payload holds non-finite floats and cannot be serialized"
        );
    }
}
