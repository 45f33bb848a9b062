//! Response envelopes for successful HTTP responses.
//!
//! Each gateway route wraps the provider result under a single top-level key:
//! `data`, `station` or `stations`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{"data": ...}` envelope used by the price list and search routes.
///
/// # Example
///
/// ```
/// use fuelprices_service_shared::DataResponse;
/// use fuelprices_lib::Value;
///
/// let response = DataResponse::new(Value::Integer(42));
/// assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"data":42}"#);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"station": ...}` envelope for a single station lookup.
#[derive(Debug, Clone, Serialize)]
pub struct StationResponse<T> {
    pub station: T,
}

impl<T> StationResponse<T> {
    pub fn new(station: T) -> Self {
        Self { station }
    }
}

/// `{"stations": ...}` envelope for the radius search.
#[derive(Debug, Clone, Serialize)]
pub struct StationsResponse<T> {
    pub stations: T,
}

impl<T> StationsResponse<T> {
    pub fn new(stations: T) -> Self {
        Self { stations }
    }
}

// Serialization goes through axum's Json: a value that cannot be written as
// strict JSON becomes the framework's plain 500 response.
macro_rules! impl_into_response {
    ($($ty:ident),*) => {
        $(
            impl<T: Serialize> IntoResponse for $ty<T> {
                fn into_response(self) -> Response {
                    Json(self).into_response()
                }
            }
        )*
    };
}

impl_into_response!(DataResponse, StationResponse, StationsResponse);

/// Body of the discovery route listing the gateway endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResponse {
    pub status: &'static str,
    pub endpoints: Endpoints,
}

/// URL templates for each data endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub get_prices: &'static str,
    pub search: &'static str,
    pub site: &'static str,
    #[serde(rename = "stations-within-radius")]
    pub stations_within_radius: &'static str,
}

impl DiscoveryResponse {
    pub fn running() -> Self {
        Self {
            status: "running",
            endpoints: Endpoints {
                get_prices: "/get_prices",
                search: "/search?query={query}&limit={limit}",
                site: "/site/{site_id}",
                stations_within_radius:
                    "/stations-within-radius?lat={lat}&lng={lng}&radius={radius}",
            },
        }
    }
}

impl IntoResponse for DiscoveryResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
