//! Report type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A suggestion and its accumulated weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSuggestion {
    pub suggestion: String,
    pub weight: f64,
}

impl WeightedSuggestion {
    pub fn new(suggestion: impl Into<String>, weight: f64) -> Self {
        Self {
            suggestion: suggestion.into(),
            weight,
        }
    }
}

/// Raw suggestion list returned for one seed phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSuggestions {
    pub phrase: String,
    pub suggestions: Vec<String>,
}

/// Final ranking of a harvest run, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedReport {
    /// Ranked entries, at most `top_n`
    pub entries: Vec<WeightedSuggestion>,
    /// Each processed phrase with its raw suggestions, in processing order
    pub per_phrase: Vec<PhraseSuggestions>,
    /// Number of distinct suggestions seen before truncation
    pub distinct_suggestions: usize,
    /// Phrases that returned no suggestions
    pub empty_phrases: usize,
    /// The run was stopped before all phrases were processed
    pub cancelled: bool,
    pub generated_at: DateTime<Utc>,
}

impl RankedReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(suggestion, weight)` pairs in rank order
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.suggestion.as_str(), e.weight))
            .collect()
    }

    /// Entries with their 1-based rank
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &WeightedSuggestion)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    /// Human-readable listing of each phrase's raw suggestions
    pub fn render_per_phrase(&self) -> String {
        let mut out = String::new();
        for phrase in &self.per_phrase {
            out.push_str(&format!("\nSuggestions for '{}':\n", phrase.phrase));
            if phrase.suggestions.is_empty() {
                out.push_str("  (none)\n");
            }
            for (i, suggestion) in phrase.suggestions.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, suggestion));
            }
        }
        out
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RankedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top weighted suggestions:")?;
        for (rank, entry) in self.ranked() {
            writeln!(f, "{}. {} (weight: {:.3})", rank, entry.suggestion, entry.weight)?;
        }
        if self.cancelled {
            writeln!(f, "(run cancelled before all phrases were processed)")?;
        }
        Ok(())
    }
}
