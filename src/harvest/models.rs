//! Harvest run parameters

use crate::error::InvalidInputError;
use crate::locales::LocaleContext;

/// Seed phrases, locale and report size for one run
#[derive(Debug, Clone)]
pub struct HarvestQuery {
    /// Phrases queried in order
    pub seeds: Vec<String>,
    /// Locale for every request (none = the source's default)
    pub locale: Option<LocaleContext>,
    /// Maximum report length
    pub top_n: usize,
}

impl HarvestQuery {
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            locale: None,
            top_n: crate::DEFAULT_TOP_N,
        }
    }

    pub fn with_locale(mut self, locale: LocaleContext) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Reject empty seed lists, empty phrases and a zero report size
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.seeds.is_empty() {
            return Err(InvalidInputError::EmptySeedList);
        }
        if let Some(index) = self.seeds.iter().position(|s| s.trim().is_empty()) {
            return Err(InvalidInputError::EmptySeedPhrase { index });
        }
        if self.top_n == 0 {
            return Err(InvalidInputError::InvalidTopN(self.top_n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = HarvestQuery::new(["a", "b"]);
        assert_eq!(query.seeds, vec!["a", "b"]);
        assert_eq!(query.top_n, 25);
        assert!(query.locale.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let empty: [&str; 0] = [];
        assert_eq!(
            HarvestQuery::new(empty).validate(),
            Err(InvalidInputError::EmptySeedList)
        );
        assert_eq!(
            HarvestQuery::new(["a", " "]).validate(),
            Err(InvalidInputError::EmptySeedPhrase { index: 1 })
        );
        assert_eq!(
            HarvestQuery::new(["a"]).with_top_n(0).validate(),
            Err(InvalidInputError::InvalidTopN(0))
        );
    }
}
