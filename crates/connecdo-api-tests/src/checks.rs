//! The checks and how each response is judged.
//!
//! Evaluation is kept free of I/O: every function here takes a captured
//! [`ProbeResponse`] and returns a [`Verdict`]. The runner owns the requests
//! and the tally.

use reqwest::StatusCode;
use serde_json::Value;

use crate::client::ProbeResponse;
use crate::error::ProbeError;

/// Test name recorded by [`Check::Root`].
pub const ROOT_TEST: &str = "Root Endpoint (/api/)";
/// Test name recorded by [`Check::Health`].
pub const HEALTH_TEST: &str = "Health Check (/api/health)";
/// Test name recorded by [`Check::Database`].
pub const DATABASE_TEST: &str = "Database Connection (/api/test-db)";
/// Test name recorded by [`Check::Cors`].
pub const CORS_TEST: &str = "CORS Headers";
/// Test name recorded by [`Check::OptionsPreflight`].
pub const OPTIONS_TEST: &str = "OPTIONS Method (CORS Preflight)";
/// Test name recorded by [`Check::NotFound`].
pub const NOT_FOUND_TEST: &str = "404 Error Handling";

/// Substring the root greeting must contain.
pub const ROOT_MESSAGE_MARKER: &str = "Connecdo API";
/// Substring of the 500 message that marks the missing-tables state.
pub const TABLES_MISSING_MARKER: &str = "Database tables not found";

/// Path of an unknown route used by the 404 check.
pub const NOT_FOUND_PATH: &str = "/nonexistent-route";

/// Required CORS headers and the substring each must contain.
pub const CORS_REQUIREMENTS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

/// Endpoints probed for JSON bodies, with the description used in test names.
pub const JSON_ENDPOINTS: [(&str, &str); 4] = [
    ("/", "Root endpoint"),
    ("/health", "Health check"),
    ("/test-db", "Database test"),
    ("/nonexistent", "404 error"),
];

/// The top-level checks, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// `GET /api/` greets with the Connecdo message.
    Root,
    /// `GET /api/health` reports healthy.
    Health,
    /// `GET /api/test-db` is connected or reports missing tables.
    Database,
    /// `GET /api/` carries the CORS headers.
    Cors,
    /// `OPTIONS /api/` answers 200.
    OptionsPreflight,
    /// Unknown routes answer 404 with a JSON error.
    NotFound,
    /// Every endpoint answers with JSON.
    JsonResponses,
}

impl Check {
    /// All checks in the order a run executes them.
    pub const ALL: [Check; 7] = [
        Check::Root,
        Check::Health,
        Check::Database,
        Check::Cors,
        Check::OptionsPreflight,
        Check::NotFound,
        Check::JsonResponses,
    ];

    /// Name used when a check dies without recording its own result.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Check::Root => "check_root",
            Check::Health => "check_health",
            Check::Database => "check_database",
            Check::Cors => "check_cors",
            Check::OptionsPreflight => "check_options_preflight",
            Check::NotFound => "check_404",
            Check::JsonResponses => "check_json_responses",
        }
    }
}

/// Judgement on one response, ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Whether the assertion held.
    pub passed: bool,
    /// Explanation of the outcome.
    pub details: String,
    /// Body to attach to the recorded result.
    pub response: Option<Value>,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub fn pass(details: impl Into<String>) -> Self {
        Self {
            passed: true,
            details: details.into(),
            response: None,
        }
    }

    /// A failing verdict.
    #[must_use]
    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            details: details.into(),
            response: None,
        }
    }

    /// Attach a response body.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// The verdict for a request that never produced a response.
    #[must_use]
    pub fn request_failed(err: &ProbeError) -> Self {
        Self::fail(format!("Request failed: {err}"))
    }
}

/// Why a database probe counts as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseAcceptance {
    /// 200 with `status == "success"`.
    Connected,
    /// 500 reporting that the tables have not been created yet.
    TablesNotCreated,
}

impl DatabaseAcceptance {
    /// Match a database probe against the accepted outcomes.
    #[must_use]
    pub fn classify(status: StatusCode, body: &Value) -> Option<Self> {
        match status {
            StatusCode::OK if body.get("status").and_then(Value::as_str) == Some("success") => {
                Some(Self::Connected)
            }
            StatusCode::INTERNAL_SERVER_ERROR
                if str_field(body, "message").is_some_and(|m| m.contains(TABLES_MISSING_MARKER)) =>
            {
                Some(Self::TablesNotCreated)
            }
            _ => None,
        }
    }
}

/// Judge `GET /api/`.
#[must_use]
pub fn evaluate_root(response: &ProbeResponse) -> Verdict {
    if response.status != StatusCode::OK {
        return unexpected_status(StatusCode::OK, response);
    }
    let data = match parse_body(response) {
        Ok(data) => data,
        Err(verdict) => return verdict,
    };

    let greeting = str_field(&data, "message")
        .filter(|m| m.contains(ROOT_MESSAGE_MARKER))
        .map(str::to_owned);
    match greeting {
        Some(message) => Verdict::pass(format!(
            "Status: {}, Message: {message}",
            response.status.as_u16()
        ))
        .with_response(data),
        None => Verdict::fail("Missing or incorrect message in response").with_response(data),
    }
}

/// Judge `GET /api/health`.
#[must_use]
pub fn evaluate_health(response: &ProbeResponse) -> Verdict {
    if response.status != StatusCode::OK {
        return unexpected_status(StatusCode::OK, response);
    }
    let data = match parse_body(response) {
        Ok(data) => data,
        Err(verdict) => return verdict,
    };

    if str_field(&data, "status") == Some("healthy") {
        Verdict::pass(format!(
            "Status: {}, Health: healthy",
            response.status.as_u16()
        ))
        .with_response(data)
    } else {
        Verdict::fail(format!(
            "Status not healthy: {}",
            field_display(&data, "status")
        ))
        .with_response(data)
    }
}

/// Judge `GET /api/test-db`.
#[must_use]
pub fn evaluate_database(response: &ProbeResponse) -> Verdict {
    assess_database(response).0
}

/// Judge `GET /api/test-db`, also reporting which acceptance branch matched.
#[must_use]
pub fn assess_database(response: &ProbeResponse) -> (Verdict, Option<DatabaseAcceptance>) {
    if response.status != StatusCode::OK && response.status != StatusCode::INTERNAL_SERVER_ERROR {
        let verdict = Verdict::fail(format!(
            "Unexpected status code: {}",
            response.status.as_u16()
        ))
        .with_response(response.body_value());
        return (verdict, None);
    }
    let data = match parse_body(response) {
        Ok(data) => data,
        Err(verdict) => return (verdict, None),
    };

    let acceptance = DatabaseAcceptance::classify(response.status, &data);
    let verdict = match acceptance {
        Some(DatabaseAcceptance::Connected) => {
            Verdict::pass("Database connection successful").with_response(data)
        }
        Some(DatabaseAcceptance::TablesNotCreated) => Verdict::pass(format!(
            "Expected error - tables not created yet: {}",
            field_display(&data, "message")
        ))
        .with_response(data),
        None if response.status == StatusCode::OK => Verdict::fail(format!(
            "Unexpected success response: {}",
            field_display(&data, "status")
        ))
        .with_response(data),
        None => Verdict::fail(format!(
            "Unexpected error message: {}",
            field_display(&data, "message")
        ))
        .with_response(data),
    };
    (verdict, acceptance)
}

/// Judge the CORS headers on `GET /api/`. The status code is not asserted.
#[must_use]
pub fn evaluate_cors(response: &ProbeResponse) -> Verdict {
    let problems: Vec<String> = CORS_REQUIREMENTS
        .iter()
        .filter_map(|&(header, expected)| match response.header(header).as_deref() {
            None | Some("") => Some(header.to_string()),
            Some(actual) if !actual.contains(expected) => {
                Some(format!("{header} (incorrect value)"))
            }
            Some(_) => None,
        })
        .collect();

    if problems.is_empty() {
        Verdict::pass("All required CORS headers present")
    } else {
        Verdict::fail(format!(
            "Missing/incorrect headers: {}",
            problems.join(", ")
        ))
    }
}

/// Judge `OPTIONS /api/`.
#[must_use]
pub fn evaluate_options(response: &ProbeResponse) -> Verdict {
    if response.status == StatusCode::OK {
        Verdict::pass(format!("Status: {}", response.status.as_u16()))
    } else {
        Verdict::fail(format!(
            "Expected 200, got {}",
            response.status.as_u16()
        ))
    }
}

/// Judge `GET /api/nonexistent-route`.
#[must_use]
pub fn evaluate_not_found(response: &ProbeResponse) -> Verdict {
    if response.status != StatusCode::NOT_FOUND {
        return Verdict::fail(format!(
            "Expected 404, got {}",
            response.status.as_u16()
        ));
    }
    let data = match parse_body(response) {
        Ok(data) => data,
        Err(verdict) => return verdict,
    };

    let error = str_field(&data, "error")
        .filter(|e| e.to_lowercase().contains("not found"))
        .map(str::to_owned);
    match error {
        Some(error) => {
            Verdict::pass(format!("Proper 404 response: {error}")).with_response(data)
        }
        None => Verdict::fail("404 status but incorrect error message").with_response(data),
    }
}

/// Judge whether a body is JSON, whatever its status.
#[must_use]
pub fn evaluate_json_body(response: &ProbeResponse) -> Verdict {
    match parse_body(response) {
        Ok(_) => Verdict::pass("Valid JSON returned"),
        Err(verdict) => verdict,
    }
}

/// Test name recorded for one JSON endpoint.
#[must_use]
pub fn json_test_name(description: &str) -> String {
    format!("JSON Response - {description}")
}

fn unexpected_status(expected: StatusCode, response: &ProbeResponse) -> Verdict {
    Verdict::fail(format!(
        "Expected {}, got {}",
        expected.as_u16(),
        response.status.as_u16()
    ))
    .with_response(response.body_value())
}

fn parse_body(response: &ProbeResponse) -> Result<Value, Verdict> {
    response.json().map_err(|e| {
        Verdict::fail(format!("Invalid JSON response: {e}"))
            .with_response(Value::String(response.body.clone()))
    })
}

fn str_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn field_display(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
