//! The upstream fuel price provider seam.
//!
//! Everything the gateway knows about the provider goes through
//! [`FuelPriceProvider`]. The production implementation is
//! [`crate::HttpProvider`]; tests substitute an in-memory provider.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::value::Value;

/// The four provider operations, used for logging, metrics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchAllPrices,
    Search,
    StationById,
    StationsWithinRadius,
}

impl Operation {
    /// Stable snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchAllPrices => "fetch_all_prices",
            Operation::Search => "search",
            Operation::StationById => "station_by_id",
            Operation::StationsWithinRadius => "stations_within_radius",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of fuel price and station data.
///
/// Results are opaque JSON-shaped trees; their schema is owned by the
/// provider. Search results may contain non-finite floats.
#[async_trait]
pub trait FuelPriceProvider: Send + Sync {
    /// Current prices for every station the provider knows about.
    async fn fetch_all_prices(&self) -> Result<Value>;

    /// Free-text station search, optionally capped at `limit` results.
    /// The limit is forwarded as given, zero and negative values included.
    async fn search(&self, query: &str, limit: Option<i64>) -> Result<Value>;

    /// A single station by its site identifier.
    async fn station_by_id(&self, site_id: &str) -> Result<Value>;

    /// Stations within `radius_km` kilometres of (`lat`, `lng`).
    async fn stations_within_radius(&self, lat: f64, lng: f64, radius_km: f64) -> Result<Value>;

    /// Human-readable identity of the provider (for logs and readiness).
    fn describe(&self) -> String;
}
