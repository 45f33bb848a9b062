//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` answers as long as the process runs. `/health/ready` also
//! reports the upstream provider and the startup price fetch outcome.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, WarmUp};

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// "ok", or "degraded" when the startup price fetch failed.
    pub status: String,

    pub service: String,

    pub version: String,

    /// Upstream provider the gateway forwards to (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,

    /// Startup price fetch result; absent when warm-up was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices_warmed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            upstream: None,
            prices_warmed: None,
            detail: None,
        }
    }

    /// Readiness status derived from the provider and warm-up outcome.
    pub fn ready(service: &str, version: &str, upstream: String, warm_up: &WarmUp) -> Self {
        let (status, detail) = match warm_up {
            WarmUp::Failed(reason) => ("degraded", Some(reason.clone())),
            WarmUp::Skipped | WarmUp::Succeeded => ("ok", None),
        };

        Self {
            status: status.to_string(),
            service: service.to_string(),
            version: version.to_string(),
            upstream: Some(upstream),
            prices_warmed: warm_up.succeeded(),
            detail,
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"fuelprices-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Always 200. A failed warm-up only degrades the reported status.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"fuelprices-service-shared","version":"0.1.0","upstream":"http://127.0.0.1:8000/","prices_warmed":true}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.provider().describe(),
        state.warm_up(),
    );
    (StatusCode::OK, Json(status)).into_response()
}
