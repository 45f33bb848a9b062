//! Test utilities for gateway handler testing.
//!
//! [`MockProvider`] is an in-memory [`FuelPriceProvider`] with canned replies
//! per operation and a log of every call it received.

use std::sync::Mutex;

use async_trait::async_trait;
use fuelprices_lib::{Error, FuelPriceProvider, Operation, Result, Value};

/// A call received by [`MockProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FetchAllPrices,
    Search { query: String, limit: Option<i64> },
    StationById(String),
    StationsWithinRadius { lat: f64, lng: f64, radius: f64 },
}

/// In-memory provider returning fixed trees.
///
/// Every operation answers with an empty array until configured otherwise.
#[derive(Debug)]
pub struct MockProvider {
    prices: Value,
    search: Value,
    station: Value,
    stations: Value,
    failure: Option<u16>,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            prices: Value::Array(Vec::new()),
            search: Value::Array(Vec::new()),
            station: Value::Array(Vec::new()),
            stations: Value::Array(Vec::new()),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_prices(mut self, prices: Value) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_search(mut self, results: Value) -> Self {
        self.search = results;
        self
    }

    pub fn with_station(mut self, station: Value) -> Self {
        self.station = station;
        self
    }

    pub fn with_stations(mut self, stations: Value) -> Self {
        self.stations = stations;
        self
    }

    /// Make every operation fail as if the upstream answered `status`.
    pub fn failing(mut self, status: u16) -> Self {
        self.failure = Some(status);
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn answer(&self, operation: Operation, call: MockCall, reply: &Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);

        match self.failure {
            Some(status) => Err(Error::UpstreamStatus {
                operation,
                status,
                url: format!("mock://fuel-prices/{}", operation),
            }),
            None => Ok(reply.clone()),
        }
    }
}

#[async_trait]
impl FuelPriceProvider for MockProvider {
    async fn fetch_all_prices(&self) -> Result<Value> {
        self.answer(Operation::FetchAllPrices, MockCall::FetchAllPrices, &self.prices)
    }

    async fn search(&self, query: &str, limit: Option<i64>) -> Result<Value> {
        let call = MockCall::Search {
            query: query.to_string(),
            limit,
        };
        self.answer(Operation::Search, call, &self.search)
    }

    async fn station_by_id(&self, site_id: &str) -> Result<Value> {
        let call = MockCall::StationById(site_id.to_string());
        self.answer(Operation::StationById, call, &self.station)
    }

    async fn stations_within_radius(&self, lat: f64, lng: f64, radius_km: f64) -> Result<Value> {
        let call = MockCall::StationsWithinRadius {
            lat,
            lng,
            radius: radius_km,
        };
        self.answer(Operation::StationsWithinRadius, call, &self.stations)
    }

    fn describe(&self) -> String {
        "mock://fuel-prices".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let provider = MockProvider::new();
        provider.search("tesco", Some(3)).await.unwrap();
        provider.station_by_id("gb-001").await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![
                MockCall::Search {
                    query: "tesco".to_string(),
                    limit: Some(3)
                },
                MockCall::StationById("gb-001".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_failing_reports_status() {
        let provider = MockProvider::new().failing(503);
        let err = provider.fetch_all_prices().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
    }
}
