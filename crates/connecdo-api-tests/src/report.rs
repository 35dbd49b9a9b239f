//! Result tally and console rendering.

use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;

const RULE_WIDTH: usize = 60;

/// Outcome of a single assertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Human-readable test name, e.g. `Health Check (/api/health)`.
    pub test_name: String,
    /// Whether the assertion held.
    pub passed: bool,
    /// Explanation of the outcome (may be empty).
    pub details: String,
    /// Response body attached to the result, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl TestResult {
    /// Console lines for this result, terminated by a blank line.
    #[must_use]
    pub fn render(&self) -> String {
        let marker = if self.passed { "✅ PASS" } else { "❌ FAIL" };
        let mut out = format!("{marker}: {}\n", self.test_name);
        if !self.details.is_empty() {
            let _ = writeln!(out, "   Details: {}", self.details);
        }
        if let Some(response) = &self.response {
            let pretty =
                serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
            let _ = writeln!(out, "   Response: {pretty}");
        }
        out.push('\n');
        out
    }
}

/// Running tally of a test run.
///
/// `total_tests == passed + failed == test_details.len()` holds after every
/// [`record`](Self::record); the counters can only change through it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestRunSummary {
    total_tests: usize,
    passed: usize,
    failed: usize,
    test_details: Vec<TestResult>,
}

impl TestRunSummary {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and bump the matching counter.
    pub fn record(
        &mut self,
        test_name: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
        response: Option<Value>,
    ) -> &TestResult {
        self.total_tests += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.test_details.push(TestResult {
            test_name: test_name.into(),
            passed,
            details: details.into(),
            response,
        });
        &self.test_details[self.test_details.len() - 1]
    }

    /// Number of recorded results.
    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.total_tests
    }

    /// Number of passing results.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failing results.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// All results in the order they were recorded.
    #[must_use]
    pub fn test_details(&self) -> &[TestResult] {
        &self.test_details
    }

    /// Failing results in record order.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.test_details.iter().filter(|r| !r.passed)
    }

    /// Whether nothing has failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Percentage of passing results; 0 when nothing was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_tests == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total_tests as f64 * 100.0
    }

    /// The closing summary block, including the failing-test recap.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "TEST SUMMARY");
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "Total Tests: {}", self.total_tests);
        let _ = writeln!(out, "Passed: {}", self.passed);
        let _ = writeln!(out, "Failed: {}", self.failed);
        let _ = writeln!(out, "Success Rate: {:.1}%", self.success_rate());
        out.push('\n');

        if self.failed > 0 {
            let _ = writeln!(out, "FAILED TESTS:");
            for result in self.failures() {
                let _ = writeln!(out, "  - {}: {}", result.test_name, result.details);
            }
        }
        out
    }
}

/// Horizontal rule used by the banner and summary.
pub(crate) fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
