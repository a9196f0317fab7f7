//! Weight map for aggregating suggestions across phrases

use super::types::WeightedSuggestion;
use std::collections::HashMap;

/// Suggestion text -> accumulated weight, remembering first-insertion order.
///
/// Keys are compared exactly (case-sensitive, no normalization).
#[derive(Debug, Clone, Default)]
pub struct SuggestionContainer {
    /// Entries in first-insertion order
    entries: Vec<WeightedSuggestion>,
    /// Suggestion text -> index into `entries`
    index: HashMap<String, usize>,
}

impl SuggestionContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add weight to a suggestion, inserting it if unseen
    pub fn add(&mut self, suggestion: &str, weight: f64) {
        match self.index.get(suggestion) {
            Some(&i) => self.entries[i].weight += weight,
            None => {
                self.index.insert(suggestion.to_string(), self.entries.len());
                self.entries
                    .push(WeightedSuggestion::new(suggestion, weight));
            }
        }
    }

    /// Fold one ranked response in, weighting each entry by position
    pub fn add_response(&mut self, suggestions: &[String]) {
        let len = suggestions.len();
        for (i, suggestion) in suggestions.iter().enumerate() {
            self.add(suggestion, crate::harvest::position_weight(i, len));
        }
    }

    /// Accumulated weight of a suggestion
    pub fn weight(&self, suggestion: &str) -> Option<f64> {
        self.index.get(suggestion).map(|&i| self.entries[i].weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &WeightedSuggestion> {
        self.entries.iter()
    }

    /// Consume the container into its top `limit` entries by descending
    /// weight; ties keep insertion order
    pub fn into_ranked(self, limit: usize) -> Vec<WeightedSuggestion> {
        let mut ranked = self.entries;
        // sort_by is stable
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ranked.truncate(limit);
        ranked
    }
}
