use thiserror::Error;

use crate::provider::Operation;

/// Convenient result alias for the fuel prices library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured upstream base URL could not be used.
    #[error("invalid upstream base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The upstream provider answered with a non-success status.
    #[error("upstream {operation} request to {url} failed with status {status}")]
    UpstreamStatus {
        operation: Operation,
        status: u16,
        url: String,
    },

    /// A station id that cannot be sent as a single path segment.
    #[error("invalid site id {site_id:?}")]
    InvalidSiteId { site_id: String },

    /// An upstream body was not a readable JSON document.
    #[error("failed to decode upstream body at line {line} column {column}: {message}")]
    Decode {
        line: usize,
        column: usize,
        message: String,
    },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// HTTP status reported by the upstream provider, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::UpstreamStatus { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
