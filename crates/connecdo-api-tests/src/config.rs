//! Runner configuration.

use std::time::Duration;

/// Deployment exercised when no override is given.
pub const DEFAULT_BASE_URL: &str = "https://23fcec76-32e2-4568-86bd-176979f69e4b.preview.emergentagent.com";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "CONNECDO_BASE_URL";

/// Configuration for a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Root address of the deployment, without the `/api` suffix.
    pub base_url: String,

    /// Timeout for every request except the database probe (default: 10s).
    pub request_timeout: Duration,

    /// Timeout for `GET /api/test-db` (default: 15s).
    pub database_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            database_timeout: Duration::from_secs(15),
        }
    }
}

impl RunnerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration, honouring `CONNECDO_BASE_URL` when it is set and non-empty.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                tracing::debug!(base_url = %url, "Using base URL from environment");
                config.with_base_url(url.trim())
            }
            _ => config,
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timeout used by most checks.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the timeout used by the database check.
    #[must_use]
    pub fn with_database_timeout(mut self, timeout: Duration) -> Self {
        self.database_timeout = timeout;
        self
    }

    /// The API root every check path is appended to.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}
