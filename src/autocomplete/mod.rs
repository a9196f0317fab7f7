//! Autocomplete suggestion fetching
//!
//! [`SuggestionClient`] queries the autocomplete endpoint for one phrase at a
//! time behind a [`Throttle`]. Consumers depend on [`SuggestionSource`] so the
//! transport can be swapped out.

mod client;
mod throttle;

pub use client::{parse_suggestions, SuggestionClient, DEFAULT_BASE_URL, DEFAULT_CLIENT_ID};
pub use throttle::{Throttle, ThrottleState};

use crate::error::InvalidInputError;
use crate::locales::LocaleContext;
use async_trait::async_trait;

/// Anything that returns ranked suggestions for a phrase
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `phrase`, best first. Environmental failures yield an
    /// empty list; only invalid input is an error.
    async fn get_suggestions(
        &self,
        phrase: &str,
        locale: Option<&LocaleContext>,
    ) -> Result<Vec<String>, InvalidInputError>;
}
