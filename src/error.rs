//! Caller-facing error types
//!
//! Network and parsing failures never reach the caller; they are absorbed by
//! the suggestion client. Only malformed input is reported back.

use thiserror::Error;

/// Rejected call caused by invalid arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// A suggestion lookup was requested for an empty phrase
    #[error("search phrase must not be empty")]
    EmptyPhrase,
    /// A harvest run was started without seed phrases
    #[error("seed phrase list must not be empty")]
    EmptySeedList,
    /// One of the seed phrases is empty
    #[error("seed phrase at index {index} is empty")]
    EmptySeedPhrase { index: usize },
    /// The requested report size is not positive
    #[error("top-N must be at least 1, got {0}")]
    InvalidTopN(usize),
}
