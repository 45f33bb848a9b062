//! Fuel prices HTTP gateway binary.
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `FUELPRICES_UPSTREAM_URL` - Upstream provider base URL (default: http://127.0.0.1:8000/)
//! - `FUELPRICES_UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! - `FUELPRICES_WARM_UP` - Fetch all prices once at startup (default: true)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_NAME` - Service name on startup and request log lines (default: fuelprices)
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint (default: enabled at /metrics)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{Instrument, error, info};

use fuelprices_lib::HttpProvider;
use fuelprices_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
    service_span,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut logging_config = LoggingConfig::from_env();
    if logging_config.service.is_none() {
        logging_config = logging_config.with_service("fuelprices");
    }
    init_logging(&logging_config).context("failed to initialize logging")?;

    run().instrument(service_span()).await
}

async fn run() -> anyhow::Result<()> {
    let metrics_config = MetricsConfig::from_env();
    let metrics_path = match init_metrics(&metrics_config) {
        Ok(()) => Some(metrics_config.path.as_str()),
        Err(e) => {
            tracing::warn!(error = %e, "continuing without metrics");
            None
        }
    };

    let config = ServiceConfig::from_env();
    info!(
        port = config.port,
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout.as_secs(),
        warm_up = config.warm_up,
        "starting fuel prices gateway"
    );

    let provider = HttpProvider::new(&config.upstream).map_err(|e| {
        error!(error = %e, "invalid upstream configuration");
        e
    })?;

    let state = AppState::connect(Arc::new(provider), config.warm_up).await;
    let app = fuelprices_service::router(state, metrics_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
