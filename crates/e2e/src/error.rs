//! Error types for the suite

use std::path::PathBuf;

use thiserror::Error;

pub type SuiteResult<T> = Result<T, SuiteError>;

/// One failed attempt at attaching a file to an upload input.
#[derive(Debug, Clone)]
pub struct UploadAttempt {
    pub selector: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Driver failed to start: {0}")]
    DriverStartup(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Driver protocol error: {0}")]
    Protocol(String),

    #[error("Target unreachable: {url} after {attempts} probe(s): {last}")]
    Unreachable {
        url: String,
        attempts: usize,
        last: String,
    },

    #[error("Navigation to {url} failed after {attempts} attempt(s): {last}")]
    Navigation {
        url: String,
        attempts: usize,
        last: String,
    },

    #[error("{action} failed on {locator}: {reason}")]
    Interaction {
        action: &'static str,
        locator: String,
        reason: String,
    },

    #[error("OTP display did not appear within {timeout_ms} ms")]
    OtpNotDisplayed { timeout_ms: u64 },

    #[error("OTP display contained no code (text was {text:?})")]
    OtpEmpty { text: String },

    #[error("Upload source not found, tried: {}", .candidates.join(", "))]
    UploadSourceNotFound { candidates: Vec<String> },

    #[error("Failed to attach {} to any upload input: {}", .path.display(), format_attempts(.attempts))]
    UploadFailed {
        path: PathBuf,
        attempts: Vec<UploadAttempt>,
    },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Unknown TC ID: {0}")]
    UnknownCase(String),

    #[error("Test case not found in data source: {0}")]
    CaseNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn format_attempts(attempts: &[UploadAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.selector, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}
