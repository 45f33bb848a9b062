//! Fuel prices HTTP gateway.
//!
//! Exposes a small read-only API in front of an upstream fuel price provider.
//!
//! # Endpoints
//!
//! - `GET /` - Endpoint discovery
//! - `GET /get_prices` - Every station price, as received
//! - `GET /search?query=&limit=` - Station search with non-finite floats replaced by `null`
//! - `GET /site/{site_id}` - A single station
//! - `GET /stations-within-radius?lat=&lng=&radius=` - Stations near a point
//! - `GET /health/live`, `GET /health/ready` - Kubernetes probes
//! - `GET /metrics` - Prometheus metrics (path configurable)

use axum::{Router, routing::get};

use fuelprices_service_shared::{
    AppState, MetricsLayer, health_live, health_ready, metrics_handler,
};

pub mod handlers;

/// Build the gateway router.
///
/// The metrics route is mounted at `metrics_path` when given.
pub fn router(state: AppState, metrics_path: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::discovery))
        .route("/get_prices", get(handlers::get_prices))
        .route("/search", get(handlers::search))
        .route("/site/{site_id}", get(handlers::site))
        .route(
            "/stations-within-radius",
            get(handlers::stations_within_radius),
        )
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if let Some(path) = metrics_path {
        app = app.route(path, get(metrics_handler));
    }

    app.layer(MetricsLayer).with_state(state)
}
