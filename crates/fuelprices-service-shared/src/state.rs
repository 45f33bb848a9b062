//! Application state for the gateway.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the upstream fuel price provider.

use std::sync::Arc;
use std::time::Instant;

use fuelprices_lib::FuelPriceProvider;

/// Outcome of the startup price fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmUp {
    /// Warm-up was disabled by configuration.
    Skipped,
    /// The provider answered the startup fetch.
    Succeeded,
    /// The startup fetch failed; the message is kept for readiness output.
    Failed(String),
}

impl WarmUp {
    /// `None` when skipped, otherwise whether the fetch succeeded.
    pub fn succeeded(&self) -> Option<bool> {
        match self {
            WarmUp::Skipped => None,
            WarmUp::Succeeded => Some(true),
            WarmUp::Failed(_) => Some(false),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. It is built once at startup and never
/// mutated afterwards.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use axum::{Router, routing::get, extract::State};
/// use fuelprices_lib::{HttpProvider, ProviderConfig};
/// use fuelprices_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let prices = state.provider().fetch_all_prices().await;
///     // ... use prices
/// }
///
/// let provider = HttpProvider::new(&ProviderConfig::default()).unwrap();
/// let state = AppState::connect(Arc::new(provider), true).await;
/// let app = Router::new()
///     .route("/get_prices", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    provider: Arc<dyn FuelPriceProvider>,
    warm_up: WarmUp,
}

impl AppState {
    /// Create application state from a provider and a known warm-up outcome.
    pub fn new(provider: Arc<dyn FuelPriceProvider>, warm_up: WarmUp) -> Self {
        Self {
            inner: Arc::new(AppStateInner { provider, warm_up }),
        }
    }

    /// Create application state, optionally fetching all prices once first.
    ///
    /// A failed warm-up is logged and recorded but does not prevent the
    /// service from starting.
    pub async fn connect(provider: Arc<dyn FuelPriceProvider>, warm_up: bool) -> Self {
        if !warm_up {
            tracing::info!(upstream = %provider.describe(), "startup price fetch disabled");
            return Self::new(provider, WarmUp::Skipped);
        }

        tracing::info!(upstream = %provider.describe(), "fetching prices at startup");
        let start = Instant::now();
        let outcome = match provider.fetch_all_prices().await {
            Ok(prices) => {
                tracing::info!(
                    kind = prices.type_name(),
                    entries = prices.len().unwrap_or(1),
                    latency_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "startup price fetch succeeded"
                );
                WarmUp::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "startup price fetch failed, continuing");
                WarmUp::Failed(e.to_string())
            }
        };

        Self::new(provider, outcome)
    }

    /// Access the upstream provider.
    pub fn provider(&self) -> &dyn FuelPriceProvider {
        self.inner.provider.as_ref()
    }

    /// Outcome of the startup price fetch.
    pub fn warm_up(&self) -> &WarmUp {
        &self.inner.warm_up
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.inner.provider.describe())
            .field("warm_up", &self.inner.warm_up)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use fuelprices_lib::Value;

    #[tokio::test]
    async fn test_connect_with_warm_up_success() {
        let provider = Arc::new(MockProvider::new().with_prices(Value::Array(vec![])));
        let state = AppState::connect(provider.clone(), true).await;

        assert_eq!(state.warm_up(), &WarmUp::Succeeded);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_with_warm_up_failure() {
        let provider = Arc::new(MockProvider::new().failing(502));
        let state = AppState::connect(provider, true).await;

        match state.warm_up() {
            WarmUp::Failed(message) => assert!(message.contains("502")),
            other => panic!("unexpected warm-up outcome: {:?}", other),
        }
        assert_eq!(state.warm_up().succeeded(), Some(false));
    }

    #[tokio::test]
    async fn test_connect_without_warm_up() {
        let provider = Arc::new(MockProvider::new());
        let state = AppState::connect(provider.clone(), false).await;

        assert_eq!(state.warm_up(), &WarmUp::Skipped);
        assert_eq!(state.warm_up().succeeded(), None);
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_app_state_clone_shares_provider() {
        let state1 = AppState::new(Arc::new(MockProvider::new()), WarmUp::Skipped);
        let state2 = state1.clone();

        assert_eq!(state1.provider().describe(), state2.provider().describe());
    }

    #[test]
    fn test_app_state_debug() {
        let state = AppState::new(Arc::new(MockProvider::new()), WarmUp::Succeeded);
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("mock://fuel-prices"));
        assert!(debug.contains("Succeeded"));
    }
}
