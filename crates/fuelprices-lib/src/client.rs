use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::decode;
use crate::error::{Error, Result};
use crate::provider::{FuelPriceProvider, Operation};
use crate::value::Value;

/// Default upstream provider location.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Default timeout applied to every upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Base URL of the upstream provider. Its path is kept and the
    /// operation segments are appended to it.
    pub base_url: String,
    /// Timeout for a single upstream request.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`FuelPriceProvider`] backed by a remote HTTP provider.
///
/// | Operation | Upstream request |
/// |---|---|
/// | fetch all prices | `GET {base}/prices` |
/// | search | `GET {base}/search?query=..&limit=..` |
/// | station by id | `GET {base}/stations/{site_id}` |
/// | stations within radius | `GET {base}/nearby?lat=..&lng=..&radius=..` |
///
/// A site id always lands in exactly one path segment below `stations/`.
/// The ids `.` and `..` would be collapsed by URL normalization and are
/// rejected with [`Error::InvalidSiteId`] before any request is sent.
///
/// Bodies are read with [`decode::from_slice`], so `NaN` and `Infinity`
/// tokens survive into the returned [`Value`].
#[derive(Debug, Clone)]
pub struct HttpProvider {
    inner: Client,
    base: Url,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "expected an http or https URL".to_string(),
            });
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;

        Ok(Self { inner, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl {
                url: self.base.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_value(
        &self,
        operation: Operation,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let start = Instant::now();
        debug!(%operation, url = %url, "calling upstream provider");

        let mut request = self
            .inner
            .get(url.clone())
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%operation, status = status.as_u16(), url = %url, "upstream returned error status");
            return Err(Error::UpstreamStatus {
                operation,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let value = decode::from_slice(&body)?;

        debug!(
            %operation,
            bytes = body.len(),
            kind = value.type_name(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "upstream response decoded"
        );
        Ok(value)
    }
}

#[async_trait]
impl FuelPriceProvider for HttpProvider {
    async fn fetch_all_prices(&self) -> Result<Value> {
        let url = self.endpoint(&["prices"])?;
        self.get_value(Operation::FetchAllPrices, url, &[]).await
    }

    async fn search(&self, query: &str, limit: Option<i64>) -> Result<Value> {
        let url = self.endpoint(&["search"])?;
        let mut params = vec![("query", query.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_value(Operation::Search, url, &params).await
    }

    async fn station_by_id(&self, site_id: &str) -> Result<Value> {
        if matches!(site_id, "" | "." | "..") {
            return Err(Error::InvalidSiteId {
                site_id: site_id.to_string(),
            });
        }
        let url = self.endpoint(&["stations", site_id])?;
        self.get_value(Operation::StationById, url, &[]).await
    }

    async fn stations_within_radius(&self, lat: f64, lng: f64, radius_km: f64) -> Result<Value> {
        let url = self.endpoint(&["nearby"])?;
        let params = [
            ("lat", lat.to_string()),
            ("lng", lng.to_string()),
            ("radius", radius_km.to_string()),
        ];
        self.get_value(Operation::StationsWithinRadius, url, &params)
            .await
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

fn user_agent() -> String {
    format!("fuelprices-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> HttpProvider {
        HttpProvider::new(&ProviderConfig::new(base)).expect("valid base url")
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let p = provider("http://upstream.local/");
        assert_eq!(
            p.endpoint(&["prices"]).unwrap().as_str(),
            "http://upstream.local/prices"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let p = provider("http://upstream.local/api/v2");
        assert_eq!(
            p.endpoint(&["stations", "gb-001"]).unwrap().as_str(),
            "http://upstream.local/api/v2/stations/gb-001"
        );

        let p = provider("http://upstream.local/api/v2/");
        assert_eq!(
            p.endpoint(&["search"]).unwrap().as_str(),
            "http://upstream.local/api/v2/search"
        );
    }

    #[test]
    fn test_endpoint_encodes_site_id() {
        let p = provider("http://upstream.local/");
        assert_eq!(
            p.endpoint(&["stations", "a/b c?"]).unwrap().as_str(),
            "http://upstream.local/stations/a%2Fb%20c%3F"
        );
        assert_eq!(
            p.endpoint(&["stations", "%2E%2E"]).unwrap().as_str(),
            "http://upstream.local/stations/%252E%252E"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpProvider::new(&ProviderConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));

        let err = HttpProvider::new(&ProviderConfig::new("mailto:ops@example.com")).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_config_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));

        let config = ProviderConfig::new("http://x/").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_describe_is_base_url() {
        assert_eq!(provider("http://upstream.local").describe(), "http://upstream.local/");
    }
}
