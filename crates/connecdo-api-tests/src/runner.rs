//! Sequential execution of the checks.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::checks::{self, Check, DatabaseAcceptance, Verdict};
use crate::client::{ApiClient, ProbeResponse};
use crate::config::RunnerConfig;
use crate::error::ProbeError;
use crate::report::{self, TestRunSummary};

/// Runs the checks against one deployment and keeps the tally.
#[derive(Debug)]
pub struct ApiTestRunner {
    client: ApiClient,
    config: RunnerConfig,
    summary: TestRunSummary,
    #[cfg(test)]
    panic_on: Option<Check>,
}

impl ApiTestRunner {
    /// Create a runner for the deployment named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable.
    pub fn new(config: RunnerConfig) -> Result<Self, ProbeError> {
        let client = ApiClient::new(&config)?;
        Ok(Self {
            client,
            config,
            summary: TestRunSummary::new(),
            #[cfg(test)]
            panic_on: None,
        })
    }

    /// The tally so far.
    #[must_use]
    pub fn summary(&self) -> &TestRunSummary {
        &self.summary
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Record one result and print it immediately.
    pub fn record(
        &mut self,
        test_name: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
        response: Option<Value>,
    ) {
        let result = self.summary.record(test_name, passed, details, response);
        print!("{}", result.render());
    }

    /// `GET /api/` must greet with the Connecdo message.
    pub async fn check_root(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        self.probe(checks::ROOT_TEST, Method::GET, "/", timeout, checks::evaluate_root)
            .await
    }

    /// `GET /api/health` must report `healthy`.
    pub async fn check_health(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        self.probe(
            checks::HEALTH_TEST,
            Method::GET,
            "/health",
            timeout,
            checks::evaluate_health,
        )
        .await
    }

    /// `GET /api/test-db` must be connected, or report that the tables are missing.
    pub async fn check_database(&mut self) -> bool {
        let timeout = self.config.database_timeout;
        self.probe(
            checks::DATABASE_TEST,
            Method::GET,
            "/test-db",
            timeout,
            |response| {
                let (verdict, acceptance) = checks::assess_database(response);
                if acceptance == Some(DatabaseAcceptance::TablesNotCreated) {
                    warn!("Database reachable but tables are not created yet");
                }
                verdict
            },
        )
        .await
    }

    /// `GET /api/` must carry the CORS headers.
    pub async fn check_cors(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        self.probe(checks::CORS_TEST, Method::GET, "/", timeout, checks::evaluate_cors)
            .await
    }

    /// `OPTIONS /api/` must answer 200.
    pub async fn check_options_preflight(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        self.probe(
            checks::OPTIONS_TEST,
            Method::OPTIONS,
            "/",
            timeout,
            checks::evaluate_options,
        )
        .await
    }

    /// An unknown route must answer 404 with a JSON `not found` error.
    pub async fn check_404(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        self.probe(
            checks::NOT_FOUND_TEST,
            Method::GET,
            checks::NOT_FOUND_PATH,
            timeout,
            checks::evaluate_not_found,
        )
        .await
    }

    /// Every endpoint must answer with a JSON body. Records one result per endpoint.
    pub async fn check_json_responses(&mut self) -> bool {
        let timeout = self.config.request_timeout;
        let mut all_passed = true;
        for (path, description) in checks::JSON_ENDPOINTS {
            let name = checks::json_test_name(description);
            all_passed &= self
                .probe(&name, Method::GET, path, timeout, checks::evaluate_json_body)
                .await;
        }
        all_passed
    }

    /// Run one top-level check.
    pub async fn run_check(&mut self, check: Check) -> bool {
        #[cfg(test)]
        if self.panic_on == Some(check) {
            panic!("{} blew up", check.name());
        }

        match check {
            Check::Root => self.check_root().await,
            Check::Health => self.check_health().await,
            Check::Database => self.check_database().await,
            Check::Cors => self.check_cors().await,
            Check::OptionsPreflight => self.check_options_preflight().await,
            Check::NotFound => self.check_404().await,
            Check::JsonResponses => self.check_json_responses().await,
        }
    }

    /// Run every check in order, print the summary, and report whether nothing failed.
    ///
    /// A check that panics is recorded as a failure under its own name and the
    /// run carries on with the next one.
    #[instrument(skip(self))]
    pub async fn run_all(&mut self) -> bool {
        println!("{}", report::rule());
        println!("CONNECDO MVP BACKEND API TESTING");
        println!("{}", report::rule());
        println!("Testing API at: {}", self.client.api_base());
        println!(
            "Started at: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        println!();

        info!(api_base = %self.client.api_base(), "Starting API test run");

        for check in Check::ALL {
            let outcome = AssertUnwindSafe(self.run_check(check))
                .catch_unwind()
                .await;
            if let Err(panic) = outcome {
                let message = panic_message(panic.as_ref());
                warn!(check = check.name(), %message, "Check aborted unexpectedly");
                self.record(
                    check.name(),
                    false,
                    format!("Unexpected error: {message}"),
                    None,
                );
            }
        }

        print!("{}", self.summary.render_summary());

        info!(
            total = self.summary.total_tests(),
            passed = self.summary.passed(),
            failed = self.summary.failed(),
            "API test run finished"
        );

        self.summary.all_passed()
    }

    /// Send one request, judge it, and record the verdict.
    async fn probe<F>(
        &mut self,
        test_name: &str,
        method: Method,
        path: &str,
        timeout: Duration,
        evaluate: F,
    ) -> bool
    where
        F: FnOnce(&ProbeResponse) -> Verdict,
    {
        let result = if method == Method::OPTIONS {
            self.client.options(path, timeout).await
        } else {
            self.client.get(path, timeout).await
        };

        let verdict = match result {
            Ok(response) => evaluate(&response),
            Err(err) => {
                warn!(test = test_name, error = %err, "Request failed");
                Verdict::request_failed(&err)
            }
        };

        let passed = verdict.passed;
        self.record(test_name, verdict.passed, verdict.details, verdict.response);
        passed
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
