//! Connecdo API smoke tests - command-line entry point.
//!
//! Runs every check against the configured deployment and exits with 0 when
//! all of them passed, 1 otherwise.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connecdo_api_tests::{ApiTestRunner, RunnerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so the report on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,connecdo_api_tests=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = RunnerConfig::from_env();

    tracing::info!(
        base_url = %config.base_url,
        request_timeout = ?config.request_timeout,
        database_timeout = ?config.database_timeout,
        "Runner configuration loaded"
    );

    let mut runner = match ApiTestRunner::new(config) {
        Ok(runner) => runner,
        Err(err) => {
            tracing::error!(error = %err, "Cannot start test run");
            return ExitCode::FAILURE;
        }
    };

    if runner.run_all().await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
