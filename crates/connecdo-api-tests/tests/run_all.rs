//! Full-run integration tests.

mod common;

use std::time::Duration;

use common::TestHarness;
use connecdo_api_tests::{ApiTestRunner, RunnerConfig};
use serde_json::json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn healthy_deployment_passes_every_check() {
    let harness = TestHarness::healthy().await;
    let mut runner = harness.runner();

    assert!(runner.run_all().await);

    let summary = runner.summary();
    assert_eq!(summary.total_tests(), 10);
    assert_eq!(summary.passed(), 10);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.test_details().len(), 10);
}

#[tokio::test]
async fn results_are_recorded_in_check_order() {
    let harness = TestHarness::healthy().await;
    let mut runner = harness.runner();

    runner.run_all().await;

    let names: Vec<_> = runner
        .summary()
        .test_details()
        .iter()
        .map(|r| r.test_name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Root Endpoint (/api/)",
            "Health Check (/api/health)",
            "Database Connection (/api/test-db)",
            "CORS Headers",
            "OPTIONS Method (CORS Preflight)",
            "404 Error Handling",
            "JSON Response - Root endpoint",
            "JSON Response - Health check",
            "JSON Response - Database test",
            "JSON Response - 404 error",
        ]
    );
}

#[tokio::test]
async fn degraded_database_still_passes_the_run() {
    let harness = TestHarness::healthy().await;
    harness
        .mount(
            "GET",
            "/api/test-db",
            ResponseTemplate::new(500).set_body_json(json!({
                "status": "error",
                "message": "Database tables not found. Please create them using the SQL provided.",
                "error": "relation \"public.users\" does not exist"
            })),
        )
        .await;
    let mut runner = harness.runner();

    assert!(runner.run_all().await);
    assert_eq!(runner.summary().failed(), 0);
}

#[tokio::test]
async fn one_failing_check_fails_the_run() {
    let harness = TestHarness::healthy().await;
    harness
        .mount(
            "GET",
            "/api/health",
            ResponseTemplate::new(200).set_body_json(json!({"status": "unhealthy"})),
        )
        .await;
    let mut runner = harness.runner();

    assert!(!runner.run_all().await);

    let summary = runner.summary();
    assert_eq!(summary.total_tests(), 10);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.passed(), 9);
    let failures: Vec<_> = summary.failures().map(|r| r.test_name.as_str()).collect();
    assert_eq!(failures, ["Health Check (/api/health)"]);
}

#[tokio::test]
async fn timeout_does_not_stop_later_checks() {
    let harness = TestHarness::healthy().await;
    harness
        .mount(
            "GET",
            "/api/",
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Connecdo API"}))
                .set_delay(Duration::from_secs(5)),
        )
        .await;
    let config = harness
        .config()
        .with_request_timeout(Duration::from_millis(200));
    let mut runner = ApiTestRunner::new(config).unwrap();

    assert!(!runner.run_all().await);

    let summary = runner.summary();
    assert_eq!(summary.total_tests(), 10);
    assert_eq!(summary.total_tests(), summary.passed() + summary.failed());

    // Root, CORS and the root JSON probe all hit the slow route
    let failures: Vec<_> = summary.failures().map(|r| r.test_name.as_str()).collect();
    assert_eq!(
        failures,
        [
            "Root Endpoint (/api/)",
            "CORS Headers",
            "JSON Response - Root endpoint",
        ]
    );
    assert!(summary
        .failures()
        .all(|r| r.details.contains("timed out after 200ms")));
}

#[tokio::test]
async fn unreachable_deployment_records_every_check_as_failed() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = RunnerConfig::new()
        .with_base_url(format!("http://127.0.0.1:{port}"))
        .with_request_timeout(Duration::from_secs(2))
        .with_database_timeout(Duration::from_secs(2));
    let mut runner = ApiTestRunner::new(config).unwrap();

    assert!(!runner.run_all().await);

    let summary = runner.summary();
    assert_eq!(summary.total_tests(), 10);
    assert_eq!(summary.failed(), 10);
    assert!(summary
        .test_details()
        .iter()
        .all(|r| r.details.starts_with("Request failed: ")));
}
