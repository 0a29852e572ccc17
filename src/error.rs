//! Error types and exit code mapping.

use std::path::PathBuf;

/// A request that never produced an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("{method} {url} timed out")]
    Timeout { method: String, url: String },

    #[error("{method} {url} failed: {source}")]
    Send {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Persisting the run report failed.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Setup failures that stop the run before or after the checks.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl AppError {
    /// Exit code for setup failures; 1 is reserved for failed checks.
    pub fn exit_code(&self) -> u8 {
        2
    }
}
