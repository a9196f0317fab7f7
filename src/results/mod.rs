//! Aggregate and report types for harvest runs

mod container;
mod types;

pub use container::SuggestionContainer;
pub use types::*;
