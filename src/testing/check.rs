//! Outcome of a single check and the helpers checks are built from.

use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::http::response::ApiResponse;

pub type CheckResult = Result<Passed, CheckFailure>;

/// A check that passed, with the detail shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passed {
    pub detail: String,
    /// Set when the check passed only because a known external dependency
    /// was unavailable. Holds the detail reported when strict runs count it
    /// as a failure.
    pub degraded: Option<String>,
}

impl Passed {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            degraded: None,
        }
    }

    pub fn degraded(detail: impl Into<String>, strict_detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            degraded: Some(strict_detail.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckFailure {
    /// No HTTP response was obtained at all.
    #[error("No response ({0})")]
    NoResponse(String),

    #[error("Expected {expected}, got {actual} (Error: {message})")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    MissingData(String),

    #[error("{0}")]
    Mismatch(String),

    /// A group could not start because an earlier one left no state behind.
    #[error("{0}")]
    Precondition(&'static str),
}

/// Require `expected` as the status of a sent request.
pub fn expect_status(
    sent: Result<ApiResponse, RequestError>,
    expected: u16,
) -> Result<ApiResponse, CheckFailure> {
    let response = sent.map_err(|err| {
        tracing::warn!(error = %err, "request error");
        CheckFailure::NoResponse(err.to_string())
    })?;
    tracing::debug!(
        expected,
        status = response.status,
        duration_ms = response.duration_ms as u64,
        "response received"
    );

    if response.status != expected {
        return Err(CheckFailure::UnexpectedStatus {
            expected,
            actual: response.status,
            message: response.error_message(),
        });
    }
    Ok(response)
}

/// Decode the response body into `T`; missing fields are a malformed body.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, CheckFailure> {
    response
        .json()
        .map_err(|err| CheckFailure::MalformedBody(err.to_string()))
}

/// Status-only check for the negative cases (401/404/400 expectations).
pub fn expect_rejection(
    sent: Result<ApiResponse, RequestError>,
    expected: u16,
    detail: &str,
) -> CheckResult {
    expect_status(sent, expected).map(|_| Passed::new(detail))
}
