//! Structured logging for the fuel prices gateway.
//!
//! - [`LoggingConfig`]: format, level filter and optional service name
//! - [`init_logging`]: install the global tracing subscriber
//! - [`service_span`]: span carrying the service name for startup code
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text` / `pretty`
//! - `RUST_LOG`: level filter (default: `info`)
//! - `SERVICE_NAME`: service name (optional)
//!
//! The service name is a field of the [`service_span`] and of every request
//! span opened by [`crate::MetricsLayer`]. JSON output includes the current
//! span, so each line logged during startup or while serving a request
//! carries `"service"`.
//!
//! # Example
//!
//! ```no_run
//! use fuelprices_service_shared::logging::{LoggingConfig, init_logging, service_span};
//!
//! let config = LoggingConfig::from_env().with_service("fuelprices");
//! init_logging(&config).expect("logging already initialized");
//! let _startup = service_span().entered();
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Span};
use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

static SERVICE_NAME: OnceCell<String> = OnceCell::new();

/// Record the process-wide service name. The first name set wins.
pub(crate) fn remember_service(name: &str) {
    SERVICE_NAME.get_or_init(|| name.to_string());
}

/// Service name installed by [`init_logging`], or `-` when none was given.
pub fn service_name() -> &'static str {
    SERVICE_NAME.get().map_or("-", String::as_str)
}

/// Span whose `service` field tags every event recorded inside it.
pub fn service_span() -> Span {
    info_span!("service", service = service_name())
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output for local runs.
    Text,
}

impl LogFormat {
    /// Parse a format name. Unknown names select `Json`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `info` or `fuelprices_lib=debug`.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_FORMAT`, `RUST_LOG` and `SERVICE_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
            level: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.level),
            service: lookup("SERVICE_NAME").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Override the service name reported in log lines.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup. A second call returns an error instead of panicking.
///
/// # JSON Format (default)
///
/// ```json
/// {"timestamp":"2026-03-02T10:00:00Z","level":"INFO","fields":{"message":"request completed","status":200},"target":"fuelprices_service_shared::middleware","span":{"service":"fuelprices","request_id":"...","method":"GET","path":"/search","name":"request"}}
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    if let Some(service) = &config.service {
        remember_service(service);
    }

    let registry = tracing_subscriber::registry().with(config.filter());

    match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }

    tracing::info!(
        service = service_name(),
        format = ?config.format,
        level = %config.level,
        "logging initialized"
    );
    Ok(())
}

/// Log sink for tests that inspect formatted output.
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Subscriber;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn subscriber(&self) -> impl Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .json()
                .with_current_span(true)
                .with_writer(self.clone())
                .finish()
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
