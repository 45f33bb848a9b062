//! Environment-driven configuration for the gateway.
//!
//! # Environment Variables
//!
//! - `SERVICE_PORT`: HTTP port (default: 8080)
//! - `FUELPRICES_UPSTREAM_URL`: Base URL of the upstream provider
//!   (default: `http://127.0.0.1:8000/`)
//! - `FUELPRICES_UPSTREAM_TIMEOUT_SECS`: Upstream request timeout (default: 30)
//! - `FUELPRICES_WARM_UP`: Fetch all prices once at startup (default: true)
//!
//! Logging and metrics read their own variables, see [`crate::logging`] and
//! [`crate::metrics`].

use std::time::Duration;

use fuelprices_lib::ProviderConfig;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Upstream provider connection settings.
    pub upstream: ProviderConfig,
    /// Whether to fetch all prices once at startup.
    pub warm_up: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream: ProviderConfig::default(),
            warm_up: true,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparsable numeric or boolean values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("SERVICE_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let base_url = lookup("FUELPRICES_UPSTREAM_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.upstream.base_url);

        let timeout = lookup("FUELPRICES_UPSTREAM_TIMEOUT_SECS")
            .and_then(|t| t.trim().parse::<u64>().ok())
            .filter(|t| *t > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.upstream.timeout);

        let warm_up = lookup("FUELPRICES_WARM_UP")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.warm_up);

        Self {
            port,
            upstream: ProviderConfig::new(base_url).with_timeout(timeout),
            warm_up,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
