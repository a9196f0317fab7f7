//! Localization module for autosuggest-rs
//!
//! Resolves a country code into the language/region hints and the opaque
//! encoded-location token sent to the autocomplete endpoint.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Built-in country code -> encoded location token table.
///
/// Tokens are passed through verbatim and never decoded or validated.
pub const LOCATION_TOKENS: &[(&str, &str)] = &[
    ("us", "w+CAIQICINVW5pdGVkIFN0YXRlcw=="),
    ("es", "w+CAIQICIGRXNwYcOxYQ=="),
    ("uk", "w+CAIQICIKVW5pdGVkIEtpbmdkb20="),
    ("fr", "w+CAIQICIGRnJhbmNl"),
    ("de", "w+CAIQICIHRwZXJtYW55"),
    ("it", "w+CAIQICIGSXRhbHk="),
    ("pt", "w+CAIQICIJUw9ydHVnYWw="),
    ("mx", "w+CAIQICIGTWXhpY28="),
    ("ar", "w+CAIQICIJQXJnZW50aW5h"),
    ("cl", "w+CAIQICIFQw5pbGU="),
];

static BUILTIN: Lazy<LocaleTable> = Lazy::new(|| LocaleTable {
    tokens: LOCATION_TOKENS
        .iter()
        .map(|(c, t)| (c.to_string(), t.to_string()))
        .collect(),
});

/// Language/region pair plus optional location token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub language: String,
    pub country: String,
    pub location_token: Option<String>,
}

impl LocaleContext {
    /// Create a locale without a location bias
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            country: country.into().to_lowercase(),
            location_token: None,
        }
    }

    /// Create a locale whose token is looked up in the built-in table
    pub fn resolve(language: &str, country: &str) -> Self {
        BUILTIN.resolve(language, country)
    }

    /// Use an explicit token instead of the table entry.
    /// An empty token clears the location bias.
    pub fn with_location_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.location_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Accept-Language header value for this locale, e.g. `es-ES,es;q=0.9`
    pub fn accept_language(&self) -> String {
        if self.language.is_empty() {
            return "en-US,en;q=0.9".to_string();
        }
        if self.country.is_empty() {
            return format!("{},en;q=0.8", self.language);
        }
        format!(
            "{}-{},{};q=0.9",
            self.language,
            self.country.to_uppercase(),
            self.language
        )
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new("en", "us")
    }
}

/// Country code -> location token mapping
#[derive(Debug, Clone)]
pub struct LocaleTable {
    tokens: HashMap<String, String>,
}

impl LocaleTable {
    /// The built-in table
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// The built-in table with extra entries; extra entries win on conflict
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (country, token) in overrides {
            table.insert(country, token);
        }
        table
    }

    /// Add or replace an entry
    pub fn insert(&mut self, country: &str, token: &str) {
        self.tokens
            .insert(country.to_lowercase(), token.to_string());
    }

    /// Token for a country, if known
    pub fn token(&self, country: &str) -> Option<&str> {
        self.tokens
            .get(&country.to_lowercase())
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Build a locale; unknown countries get no location bias
    pub fn resolve(&self, language: &str, country: &str) -> LocaleContext {
        let mut locale = LocaleContext::new(language, country);
        locale.location_token = self.token(country).map(String::from);
        locale
    }

    /// Known country codes, sorted
    pub fn countries(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.tokens.keys().map(|s| s.as_str()).collect();
        countries.sort_unstable();
        countries
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
