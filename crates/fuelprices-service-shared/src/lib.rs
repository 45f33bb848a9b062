//! Shared infrastructure for the fuel prices HTTP gateway.
//!
//! This crate provides the HTTP glue used by the gateway service:
//!
//! - [`AppState`]: The long-lived upstream provider handle shared by handlers
//! - `health`: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - Response envelopes ([`DataResponse`], [`StationResponse`], [`StationsResponse`])
//! - [`ServiceConfig`]: Environment-driven configuration
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - Typed query parameters for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; data comes from the provider in `fuelprices-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract query / path parameters                          │
//! │  - Call the FuelPriceProvider                               │
//! │  - Sanitize (search only) and wrap in an envelope           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The `test_utils` module provides an in-memory provider for handler
//! testing. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, service_span, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_non_finite_replaced, record_upstream_call,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_UPSTREAM_ERROR,
};
pub use request::{RadiusQuery, SearchQuery};
pub use response::{DataResponse, DiscoveryResponse, StationResponse, StationsResponse};
pub use state::{AppState, WarmUp};
