//! Fetch failure taxonomy

use thiserror::Error;

/// Why a suggestion fetch produced no data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The request did not complete in time
    #[error("request timed out")]
    Timeout,
    /// The endpoint answered with a non-2xx status
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// The body did not have the expected shape
    #[error("malformed response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}
