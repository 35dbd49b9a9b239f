//! Probe error types.

use std::time::Duration;

/// Errors that can occur while probing the API.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// HTTP request failed (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within its timeout.
    #[error("request to {url} timed out after {after:?}")]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProbeError {
    /// Classify a reqwest error, separating timeouts from other transport failures.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str, after: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                after,
            }
        } else {
            Self::Http(err)
        }
    }
}
