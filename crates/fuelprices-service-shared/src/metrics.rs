//! Prometheus metrics for the fuel prices gateway.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for the metrics endpoint
//! - Helpers for upstream provider and sanitizer metrics
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.
//!
//! # Example
//!
//! ```no_run
//! use fuelprices_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::from_env();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use std::time::Duration;

use fuelprices_lib::Operation;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "false" disables metrics (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);

        let path = lookup("METRICS_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| p.starts_with('/') && p.len() > 1)
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Errors
///
/// - [`MetricsError::Disabled`] when the configuration turns metrics off
/// - [`MetricsError::AlreadyInitialized`] on a second call
/// - [`MetricsError::InstallFailed`] when another global recorder exists
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Axum handler for the metrics endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Record one call to the upstream provider.
///
/// Increments `fuelprices_upstream_requests_total{operation,outcome}` and
/// records `fuelprices_upstream_duration_seconds{operation}`.
pub fn record_upstream_call(operation: Operation, success: bool, elapsed: Duration) {
    let outcome = if success { "ok" } else { "error" };

    metrics::counter!(
        "fuelprices_upstream_requests_total",
        "operation" => operation.as_str(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "fuelprices_upstream_duration_seconds",
        "operation" => operation.as_str()
    )
    .record(elapsed.as_secs_f64());
}

/// Record how many non-finite floats one sanitized response replaced.
pub fn record_non_finite_replaced(count: usize) {
    metrics::histogram!("fuelprices_non_finite_replaced").record(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_from_lookup() {
        let vars: HashMap<&str, &str> =
            [("METRICS_ENABLED", "FALSE"), ("METRICS_PATH", "/internal/metrics")]
                .into_iter()
                .collect();
        let config = MetricsConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert!(!config.enabled);
        assert_eq!(config.path, "/internal/metrics");
    }

    #[test]
    fn test_metrics_config_rejects_relative_path() {
        let config = MetricsConfig::from_lookup(|k| {
            (k == "METRICS_PATH").then(|| "metrics".to_string())
        });
        assert_eq!(config, MetricsConfig::default());
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };
        assert_eq!(init_metrics(&config), Err(MetricsError::Disabled));
    }

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let output = metrics_handler().await;
        assert!(output.is_empty() || output.contains('#') || output.contains("_total"));
    }

    #[test]
    fn test_helpers_without_recorder() {
        record_upstream_call(Operation::Search, true, Duration::from_millis(12));
        record_upstream_call(Operation::StationById, false, Duration::from_millis(3));
        record_non_finite_replaced(0);
        record_non_finite_replaced(4);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
