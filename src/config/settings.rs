//! Settings structures for autosuggest-rs configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Desktop Chrome user agent sent by the direct transport
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Value of the `X-Client-Data` header sent alongside browser-like requests
pub const DEFAULT_CLIENT_DATA: &str = "CJW2yQEIpLbJAQipncoBCMKcygEIkqHLAQj6mM0BCIWgzQE=";

/// Upper bound for `outgoing.request_timeout`, in seconds
pub const MAX_REQUEST_TIMEOUT: f64 = 300.0;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub outgoing: OutgoingSettings,
    pub suggest: SuggestSettings,
    pub harvest: HarvestSettings,
    /// Extra country code -> encoded location token entries
    pub locations: HashMap<String, String>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (AUTOSUGGEST_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("AUTOSUGGEST_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("AUTOSUGGEST_MIN_DELAY_MS") {
            if let Ok(delay) = val.parse() {
                self.suggest.min_delay_ms = delay;
            }
        }
        if let Ok(val) = std::env::var("AUTOSUGGEST_LANGUAGE") {
            self.suggest.language = val;
        }
        if let Ok(val) = std::env::var("AUTOSUGGEST_COUNTRY") {
            self.suggest.country = val;
        }
        if let Ok(val) = std::env::var("AUTOSUGGEST_TOP_N") {
            if let Ok(top_n) = val.parse() {
                self.harvest.top_n = top_n;
            }
        }
    }

    /// Check values that cannot be expressed in the type system
    pub fn validate(&self) -> Result<()> {
        if self.harvest.top_n == 0 {
            bail!("harvest.top_n must be at least 1");
        }
        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 || timeout > MAX_REQUEST_TIMEOUT {
            bail!(
                "outgoing.request_timeout must be between 0 and {} seconds, got {}",
                MAX_REQUEST_TIMEOUT,
                timeout
            );
        }
        if !crate::network::is_valid_callback_prefix(&self.suggest.callback_prefix) {
            bail!(
                "suggest.callback_prefix '{}' is not a valid callback name",
                self.suggest.callback_prefix
            );
        }
        if let Err(e) = url::Url::parse(&self.suggest.base_url) {
            bail!("suggest.base_url is not a valid URL: {}", e);
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Fixed user agent (none = built-in desktop Chrome string)
    pub useragent: Option<String>,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            useragent: None,
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// How the autocomplete endpoint is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Plain GET returning a JSON array
    #[default]
    Direct,
    /// GET with a callback parameter returning a JSONP-wrapped array
    Callback,
}

impl std::str::FromStr for TransportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "callback" | "jsonp" => Ok(Self::Callback),
            other => bail!("unknown transport: {}", other),
        }
    }
}

/// Autocomplete endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Endpoint URL
    pub base_url: String,
    /// Value of the `client` query parameter
    pub client: String,
    /// Minimum spacing between two requests, in milliseconds
    pub min_delay_ms: u64,
    /// Default language hint
    pub language: String,
    /// Default country/region hint
    pub country: String,
    /// Transport variant
    pub transport: TransportKind,
    /// Prefix of generated JSONP callback names
    pub callback_prefix: String,
    /// `X-Client-Data` header value (none = omit the header)
    pub client_data: Option<String>,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            base_url: crate::autocomplete::DEFAULT_BASE_URL.to_string(),
            client: crate::autocomplete::DEFAULT_CLIENT_ID.to_string(),
            min_delay_ms: crate::DEFAULT_MIN_DELAY_MS,
            language: "es".to_string(),
            country: "es".to_string(),
            transport: TransportKind::Direct,
            callback_prefix: "googleComplete".to_string(),
            client_data: Some(DEFAULT_CLIENT_DATA.to_string()),
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format: {}", other),
        }
    }
}

/// Harvest run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Number of entries kept in the final report
    pub top_n: usize,
    /// Seed phrases used when none are given on the command line
    pub seeds: Vec<String>,
    /// Report format
    pub format: OutputFormat,
    /// Print each phrase's raw suggestion list before the ranking
    pub show_per_phrase: bool,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            top_n: crate::DEFAULT_TOP_N,
            seeds: vec![
                "alquilar mi piso zaragoza".to_string(),
                "vender mi piso en zaragoza".to_string(),
                "alquiler seguro zaragoza".to_string(),
            ],
            format: OutputFormat::Text,
            show_per_phrase: false,
        }
    }
}
