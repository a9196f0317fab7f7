//! JSON fetchers
//!
//! Two ways of getting the same JSON document out of the endpoint: a plain
//! GET, or a GET that asks for the payload wrapped in a named callback.

use super::client::HttpClient;
use super::error::FetchError;
use super::types::FetchRequest;
use super::user_agent::accept_json;
use crate::config::TransportKind;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

static JSONP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(?:/\*\*/)?\s*([A-Za-z_$][\w$.]*)\s*\(\s*(.*?)\s*\)\s*;?\s*$")
        .expect("JSONP pattern is valid")
});

static CALLBACK_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$.]*$").expect("callback prefix pattern is valid"));

/// Whether `prefix` followed by digits forms a callback name the endpoint
/// will echo back in a form [`unwrap_jsonp`] accepts
pub fn is_valid_callback_prefix(prefix: &str) -> bool {
    CALLBACK_PREFIX_RE.is_match(prefix)
}

/// Fetch a URL and decode its body as JSON
#[async_trait]
pub trait HttpJsonFetcher: Send + Sync {
    /// Transport name
    fn name(&self) -> &str;

    /// Issue the request and decode the JSON payload
    async fn fetch_json(&self, request: FetchRequest) -> Result<serde_json::Value, FetchError>;
}

/// Build the fetcher for a transport kind
pub fn fetcher_for(
    kind: TransportKind,
    client: HttpClient,
    callback_prefix: &str,
) -> Arc<dyn HttpJsonFetcher> {
    match kind {
        TransportKind::Direct => Arc::new(DirectFetch::new(client)),
        TransportKind::Callback => Arc::new(CallbackFetch::new(client, callback_prefix)),
    }
}

/// Plain GET; the body is the JSON document
pub struct DirectFetch {
    client: HttpClient,
}

impl DirectFetch {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpJsonFetcher for DirectFetch {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch_json(&self, request: FetchRequest) -> Result<serde_json::Value, FetchError> {
        let response = self.client.execute(request).await?;
        if response.is_rate_limited() {
            warn!("Autocomplete endpoint is rate limiting ({})", response.url);
        }
        let response = response.error_for_status()?;
        Ok(serde_json::from_str(&response.text)?)
    }
}

/// GET with a `callback` parameter; the body is `name(<json>)`
pub struct CallbackFetch {
    client: HttpClient,
    prefix: String,
}

impl CallbackFetch {
    pub fn new(client: HttpClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Callback name for a new request: prefix plus unix millis
    pub fn callback_name(&self) -> String {
        format!("{}{}", self.prefix, chrono::Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl HttpJsonFetcher for CallbackFetch {
    fn name(&self) -> &str {
        "callback"
    }

    async fn fetch_json(&self, request: FetchRequest) -> Result<serde_json::Value, FetchError> {
        let callback = self.callback_name();
        let request = request
            .param("callback", callback.as_str())
            .header("Accept", accept_json());

        debug!("Requesting JSONP payload with callback {}", callback);

        let response = self.client.execute(request).await?;
        if response.is_rate_limited() {
            warn!("Autocomplete endpoint is rate limiting ({})", response.url);
        }
        let response = response.error_for_status()?;
        let payload = unwrap_jsonp(&response.text, &callback)?;
        Ok(serde_json::from_str(payload)?)
    }
}

/// Strip a `name(...)` wrapper, checking the callback name matches
pub fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> Result<&'a str, FetchError> {
    let caps = JSONP_RE
        .captures(body)
        .ok_or_else(|| FetchError::Parse("body is not a callback invocation".to_string()))?;

    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if name != callback {
        return Err(FetchError::Parse(format!(
            "callback name mismatch: expected {}, got {}",
            callback, name
        )));
    }

    caps.get(2)
        .map(|m| m.as_str())
        .ok_or_else(|| FetchError::Parse("empty callback payload".to_string()))
}
