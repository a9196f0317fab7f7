//! Harvest execution

use super::models::HarvestQuery;
use crate::autocomplete::SuggestionSource;
use crate::error::InvalidInputError;
use crate::locales::LocaleContext;
use crate::results::{PhraseSuggestions, RankedReport, SuggestionContainer};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Set to `true` to stop a run at the next phrase boundary
pub type CancelSignal = watch::Receiver<bool>;

/// Drives a suggestion source over seed phrases and ranks the results.
///
/// Holds no state between runs; every run starts from an empty aggregate.
pub struct SuggestionAggregator {
    source: Arc<dyn SuggestionSource>,
}

impl SuggestionAggregator {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self { source }
    }

    /// Query each phrase in order and return the `top_n` heaviest suggestions
    pub async fn run(
        &self,
        seeds: &[String],
        locale: Option<&LocaleContext>,
        top_n: usize,
    ) -> Result<RankedReport, InvalidInputError> {
        let query = HarvestQuery {
            seeds: seeds.to_vec(),
            locale: locale.cloned(),
            top_n,
        };
        self.execute(&query, None).await
    }

    /// Run a harvest query, stopping early if `cancel` turns true.
    ///
    /// Phrases are processed strictly one after another. A phrase whose
    /// lookup comes back empty contributes nothing and the run moves on.
    pub async fn execute(
        &self,
        query: &HarvestQuery,
        mut cancel: Option<CancelSignal>,
    ) -> Result<RankedReport, InvalidInputError> {
        query.validate()?;

        let mut container = SuggestionContainer::new();
        let mut per_phrase = Vec::with_capacity(query.seeds.len());
        let mut empty_phrases = 0;
        let mut cancelled = false;

        for phrase in &query.seeds {
            if is_cancelled(&cancel) {
                cancelled = true;
                break;
            }

            info!("Fetching suggestions for '{}'", phrase);

            let lookup = self.source.get_suggestions(phrase, query.locale.as_ref());
            let suggestions = tokio::select! {
                biased;
                _ = wait_cancelled(&mut cancel) => {
                    cancelled = true;
                    break;
                }
                result = lookup => result?,
            };

            if suggestions.is_empty() {
                warn!("No suggestions for '{}'", phrase);
                empty_phrases += 1;
            } else {
                debug!("'{}' returned {} suggestions", phrase, suggestions.len());
            }

            container.add_response(&suggestions);
            per_phrase.push(PhraseSuggestions {
                phrase: phrase.clone(),
                suggestions,
            });
        }

        if cancelled {
            info!(
                "Harvest cancelled after {} of {} phrases",
                per_phrase.len(),
                query.seeds.len()
            );
        }

        let distinct_suggestions = container.len();
        let entries = container.into_ranked(query.top_n);

        info!(
            "Harvest finished: {} distinct suggestions, reporting top {}",
            distinct_suggestions,
            entries.len()
        );

        Ok(RankedReport {
            entries,
            per_phrase,
            distinct_suggestions,
            empty_phrases,
            cancelled,
            generated_at: Utc::now(),
        })
    }
}

fn is_cancelled(cancel: &Option<CancelSignal>) -> bool {
    cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
}

/// Resolves once the signal reads true; never resolves without a signal or
/// after the sender is dropped.
async fn wait_cancelled(cancel: &mut Option<CancelSignal>) {
    if let Some(rx) = cancel.as_mut() {
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
    std::future::pending::<()>().await
}
