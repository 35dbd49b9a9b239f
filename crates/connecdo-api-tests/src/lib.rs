//! Connecdo API smoke tests.
//!
//! This crate runs a fixed sequence of HTTP checks against a deployed Connecdo
//! API and tallies the results:
//!
//! - **Root**: `GET /api/` returns the Connecdo welcome message
//! - **Health**: `GET /api/health` reports `healthy`
//! - **Database**: `GET /api/test-db` is connected, or reports missing tables
//! - **CORS**: the root route carries the expected `Access-Control-*` headers
//! - **Preflight**: `OPTIONS /api/` answers 200
//! - **404**: unknown routes return a JSON `not found` error
//! - **JSON**: every endpoint answers with a parseable JSON body
//!
//! # Example
//!
//! ```no_run
//! use connecdo_api_tests::{ApiTestRunner, RunnerConfig};
//!
//! # async fn example() -> Result<(), connecdo_api_tests::ProbeError> {
//! let config = RunnerConfig::new().with_base_url("http://localhost:3000");
//! let mut runner = ApiTestRunner::new(config)?;
//!
//! let all_passed = runner.run_all().await;
//! println!("{} of {} passed", runner.summary().passed(), runner.summary().total_tests());
//! # let _ = all_passed;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checks;
mod client;
mod config;
mod error;
pub mod report;
mod runner;

pub use checks::{Check, DatabaseAcceptance, Verdict};
pub use client::{ApiClient, ProbeResponse};
pub use config::{RunnerConfig, DEFAULT_BASE_URL};
pub use error::ProbeError;
pub use report::{TestResult, TestRunSummary};
pub use runner::ApiTestRunner;
