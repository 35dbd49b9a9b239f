//! Common test utilities for runner integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use connecdo_api_tests::{ApiTestRunner, RunnerConfig};

/// Test harness wrapping a mock deployment.
pub struct TestHarness {
    /// The mock server standing in for the deployment.
    pub server: MockServer,
}

impl TestHarness {
    /// Start a mock server with nothing mounted.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Start a mock server answering every endpoint the way a healthy deployment does.
    pub async fn healthy() -> Self {
        let harness = Self::new().await;
        harness.mount_healthy_api().await;
        harness
    }

    /// Runner configuration pointing at the mock server.
    pub fn config(&self) -> RunnerConfig {
        RunnerConfig::new()
            .with_base_url(self.server.uri())
            .with_request_timeout(Duration::from_secs(2))
            .with_database_timeout(Duration::from_secs(2))
    }

    /// A fresh runner pointing at the mock server.
    pub fn runner(&self) -> ApiTestRunner {
        ApiTestRunner::new(self.config()).expect("Failed to create runner")
    }

    /// Mount `template` for `verb path`, taking precedence over the healthy defaults.
    pub async fn mount(&self, verb: &str, route: &str, template: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(template)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Mount the healthy defaults for every endpoint.
    pub async fn mount_healthy_api(&self) {
        let defaults = [
            (
                "GET",
                "/api/",
                with_cors(ResponseTemplate::new(200).set_body_json(json!({
                    "message": "Connecdo API - Where Problems Meet Solutions",
                    "version": "1.0.0"
                }))),
            ),
            (
                "GET",
                "/api/health",
                with_cors(ResponseTemplate::new(200).set_body_json(json!({
                    "status": "healthy",
                    "timestamp": "2026-10-18T09:00:00.000Z",
                    "service": "connecdo-api"
                }))),
            ),
            (
                "GET",
                "/api/test-db",
                with_cors(ResponseTemplate::new(200).set_body_json(json!({
                    "status": "success",
                    "message": "Database connection successful",
                    "data": []
                }))),
            ),
            ("OPTIONS", "/api/", with_cors(ResponseTemplate::new(200))),
            (
                "GET",
                "/api/nonexistent-route",
                with_cors(ResponseTemplate::new(404).set_body_json(json!({
                    "error": "Route /nonexistent-route not found"
                }))),
            ),
            (
                "GET",
                "/api/nonexistent",
                with_cors(ResponseTemplate::new(404).set_body_json(json!({
                    "error": "Route /nonexistent not found"
                }))),
            ),
        ];

        for (verb, route, template) in defaults {
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(template)
                .mount(&self.server)
                .await;
        }
    }
}

/// Add the CORS headers the deployment sets on every response.
pub fn with_cors(template: ResponseTemplate) -> ResponseTemplate {
    template
        .insert_header("Access-Control-Allow-Origin", "*")
        .insert_header(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        )
        .insert_header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .insert_header("Access-Control-Allow-Credentials", "true")
}
