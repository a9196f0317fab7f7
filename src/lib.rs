//! autosuggest-rs: search autocomplete harvesting and ranking
//!
//! Queries an autocomplete endpoint for a list of seed phrases, spacing the
//! requests out, and ranks every suggestion by how high and how often it
//! appeared.

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod harvest;
pub mod locales;
pub mod metrics;
pub mod network;
pub mod results;

pub use autocomplete::{SuggestionClient, SuggestionSource};
pub use config::Settings;
pub use error::InvalidInputError;
pub use harvest::{HarvestQuery, SuggestionAggregator};
pub use locales::LocaleContext;
pub use results::{RankedReport, WeightedSuggestion};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default spacing between autocomplete requests in milliseconds
pub const DEFAULT_MIN_DELAY_MS: u64 = 2000;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Default number of report entries
pub const DEFAULT_TOP_N: usize = 25;
