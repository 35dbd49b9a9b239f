//! HTTP client for the API under test.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::RunnerConfig;
use crate::error::ProbeError;

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: String,
}

impl ProbeResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The body as a JSON value, falling back to a JSON string holding the raw text.
    #[must_use]
    pub fn body_value(&self) -> Value {
        self.json().unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Look up a header, joining repeated lines with `, `.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than dropped, so a
    /// garbled value still counts as present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        let values: Vec<_> = self
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }
}

/// Client bound to the `/api` root of one deployment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_base: String,
}

impl ApiClient {
    /// Create a client for the deployment named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or unparseable, or if the HTTP
    /// client cannot be built.
    pub fn new(config: &RunnerConfig) -> Result<Self, ProbeError> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(ProbeError::Configuration("base URL is empty".into()));
        }
        reqwest::Url::parse(base_url).map_err(|e| {
            ProbeError::Configuration(format!("invalid base URL {base_url:?}: {e}"))
        })?;

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_base: config.api_base(),
        })
    }

    /// The API root, e.g. `https://host/api`.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Full URL for a path below the API root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    /// Issue `GET <api_base><path>`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or timeout.
    pub async fn get(&self, path: &str, timeout: Duration) -> Result<ProbeResponse, ProbeError> {
        self.send(Method::GET, path, timeout).await
    }

    /// Issue `OPTIONS <api_base><path>`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or timeout.
    pub async fn options(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        self.send(Method::OPTIONS, path, timeout).await
    }

    /// Send a request and read the whole body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        timeout: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, ?timeout, "Sending request");

        let response = self
            .client
            .request(method, &url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ProbeError::from_transport(e, &url, timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::from_transport(e, &url, timeout))?;

        tracing::debug!(%url, status = status.as_u16(), body_len = body.len(), "Received response");

        Ok(ProbeResponse {
            status,
            headers,
            body,
        })
    }
}
