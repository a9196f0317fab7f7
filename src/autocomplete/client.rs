//! Rate-limited autocomplete client

use super::throttle::Throttle;
use super::SuggestionSource;
use crate::config::Settings;
use crate::error::InvalidInputError;
use crate::locales::{LocaleContext, LocaleTable};
use crate::metrics::Metrics;
use crate::network::{fetcher_for, FetchError, FetchRequest, HttpClient, HttpJsonFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default autocomplete endpoint
pub const DEFAULT_BASE_URL: &str = "https://suggestqueries.google.com/complete/search";

/// Default value of the `client` parameter
pub const DEFAULT_CLIENT_ID: &str = "chrome";

/// Fetches ranked suggestions for one phrase at a time, never issuing two
/// requests closer together than the configured minimum delay.
pub struct SuggestionClient {
    fetcher: Arc<dyn HttpJsonFetcher>,
    base_url: String,
    client_id: String,
    client_data: Option<String>,
    default_locale: LocaleContext,
    /// Held across the wait so check-then-record is atomic
    throttle: Mutex<Throttle>,
    metrics: Arc<Metrics>,
}

impl SuggestionClient {
    /// Create a client with default endpoint, locale and spacing
    pub fn new(fetcher: Arc<dyn HttpJsonFetcher>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_data: None,
            default_locale: LocaleContext::default(),
            throttle: Mutex::new(Throttle::default()),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Create a client from settings
    pub fn from_settings(settings: &Settings, metrics: Arc<Metrics>) -> anyhow::Result<Self> {
        let http = HttpClient::with_settings(&settings.outgoing)?;
        let fetcher = fetcher_for(
            settings.suggest.transport,
            http,
            &settings.suggest.callback_prefix,
        );
        let table = LocaleTable::with_overrides(&settings.locations);
        let locale = table.resolve(&settings.suggest.language, &settings.suggest.country);

        let mut client = Self::new(fetcher)
            .with_base_url(settings.suggest.base_url.clone())
            .with_client_id(settings.suggest.client.clone())
            .with_min_delay(Duration::from_millis(settings.suggest.min_delay_ms))
            .with_default_locale(locale)
            .with_metrics(metrics);
        client.client_data = settings.suggest.client_data.clone();
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Send an `X-Client-Data` header with every request
    pub fn with_client_data(mut self, client_data: impl Into<String>) -> Self {
        self.client_data = Some(client_data.into());
        self
    }

    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.throttle = Mutex::new(Throttle::new(min_delay));
        self
    }

    /// Locale used when a call does not pass one
    pub fn with_default_locale(mut self, locale: LocaleContext) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Transport in use
    pub fn transport(&self) -> &str {
        self.fetcher.name()
    }

    /// Build the endpoint request for a phrase
    pub fn build_request(&self, phrase: &str, locale: &LocaleContext) -> FetchRequest {
        let mut request = FetchRequest::get(&self.base_url)
            .param("client", &self.client_id)
            .param("q", phrase)
            .param("hl", &locale.language)
            .param("gl", &locale.country)
            .param("ds", "")
            .header("Accept-Language", locale.accept_language());

        if let Some(ref token) = locale.location_token {
            request = request.param("uule", token);
        }
        if let Some(ref client_data) = self.client_data {
            request = request.header("X-Client-Data", client_data);
        }
        request
    }

    /// Fetch suggestions for a phrase.
    ///
    /// Network and parse failures yield an empty list; they are logged and
    /// counted in the metrics. Only an empty phrase is rejected.
    pub async fn get_suggestions(
        &self,
        phrase: &str,
        locale: Option<&LocaleContext>,
    ) -> Result<Vec<String>, InvalidInputError> {
        if phrase.trim().is_empty() {
            return Err(InvalidInputError::EmptyPhrase);
        }
        let locale = locale.unwrap_or(&self.default_locale);
        let request = self.build_request(phrase, locale);

        let started = {
            let mut throttle = self.throttle.lock().await;
            throttle.acquire().await;
            self.metrics.record_request();
            Instant::now()
        };

        match self.fetch(request).await {
            Ok(suggestions) => {
                let elapsed = started.elapsed();
                self.metrics.record_success(elapsed.as_millis() as u64);
                debug!(
                    "Got {} suggestions for '{}' in {:?}",
                    suggestions.len(),
                    phrase,
                    elapsed
                );
                Ok(suggestions)
            }
            Err(e) => {
                warn!("Error fetching suggestions for '{}' ({}): {}", phrase, e.kind(), e);
                self.metrics.record_failure(e.kind());
                Ok(Vec::new())
            }
        }
    }

    async fn fetch(&self, request: FetchRequest) -> Result<Vec<String>, FetchError> {
        let json = self.fetcher.fetch_json(request).await?;
        parse_suggestions(&json)
    }
}

#[async_trait]
impl SuggestionSource for SuggestionClient {
    async fn get_suggestions(
        &self,
        phrase: &str,
        locale: Option<&LocaleContext>,
    ) -> Result<Vec<String>, InvalidInputError> {
        SuggestionClient::get_suggestions(self, phrase, locale).await
    }
}

/// Extract the suggestion list from `[query, [suggestions...], ...]`.
/// Non-string entries are skipped; order is kept.
pub fn parse_suggestions(json: &serde_json::Value) -> Result<Vec<String>, FetchError> {
    let list = json
        .as_array()
        .ok_or_else(|| FetchError::Parse("expected a JSON array".to_string()))?
        .get(1)
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchError::Parse("missing suggestion list at index 1".to_string()))?;

    Ok(list
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::DirectFetch;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SuggestionClient {
        let fetcher = Arc::new(DirectFetch::new(HttpClient::new().unwrap()));
        SuggestionClient::new(fetcher)
            .with_base_url(format!("{}/complete/search", server.uri()))
            .with_min_delay(Duration::from_millis(50))
    }

    #[test]
    fn test_parse_suggestions() {
        let value = json!(["pisos", ["pisos baratos", 3, "pisos zaragoza"], [], {"x": 1}]);
        assert_eq!(
            parse_suggestions(&value).unwrap(),
            vec!["pisos baratos", "pisos zaragoza"]
        );
        assert!(parse_suggestions(&json!(["pisos", []])).unwrap().is_empty());
        assert!(parse_suggestions(&json!({"q": "pisos"})).is_err());
        assert!(parse_suggestions(&json!(["pisos"])).is_err());
    }

    #[test]
    fn test_build_request_with_location() {
        let fetcher = Arc::new(DirectFetch::new(HttpClient::new().unwrap()));
        let client = SuggestionClient::new(fetcher).with_client_data("abc");
        let locale = LocaleContext::resolve("es", "es");
        let request = client.build_request("pisos", &locale);

        let keys: Vec<&str> = request.params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["client", "q", "hl", "gl", "ds", "uule"]);
        assert_eq!(request.param_value("client"), Some("chrome"));
        assert_eq!(request.param_value("ds"), Some(""));
        assert_eq!(request.param_value("uule"), Some("w+CAIQICIGRXNwYcOxYQ=="));
        assert_eq!(request.headers.get("Accept-Language").unwrap(), "es-ES,es;q=0.9");
        assert_eq!(request.headers.get("X-Client-Data").unwrap(), "abc");
    }

    #[test]
    fn test_build_request_without_location_omits_uule() {
        let fetcher = Arc::new(DirectFetch::new(HttpClient::new().unwrap()));
        let client = SuggestionClient::new(fetcher);
        let request = client.build_request("pisos", &LocaleContext::resolve("ja", "jp"));
        assert_eq!(request.param_value("uule"), None);
        assert!(!request.headers.contains_key("X-Client-Data"));
    }

    #[tokio::test]
    async fn test_empty_phrase_is_rejected() {
        let fetcher = Arc::new(DirectFetch::new(HttpClient::new().unwrap()));
        let client = SuggestionClient::new(fetcher);
        assert_eq!(
            client.get_suggestions("", None).await,
            Err(InvalidInputError::EmptyPhrase)
        );
        assert_eq!(
            client.get_suggestions("   ", None).await,
            Err(InvalidInputError::EmptyPhrase)
        );
        assert_eq!(client.metrics().requests(), 0);
    }

    #[tokio::test]
    async fn test_get_suggestions_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complete/search"))
            .and(query_param("client", "chrome"))
            .and(query_param("q", "alquiler zaragoza"))
            .and(query_param("hl", "es"))
            .and(query_param("gl", "es"))
            .and(query_param("ds", ""))
            .and(query_param("uule", "w+CAIQICIGRXNwYcOxYQ=="))
            .and(header_exists("Accept-Language"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                "alquiler zaragoza",
                ["zeta", "alfa", "media"],
                [],
                {"google:suggesttype": ["QUERY", "QUERY", "QUERY"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let locale = LocaleContext::resolve("es", "es");
        let suggestions = client
            .get_suggestions("alquiler zaragoza", Some(&locale))
            .await
            .unwrap();

        assert_eq!(suggestions, vec!["zeta", "alfa", "media"]);
        assert_eq!(client.metrics().successes(), 1);
    }

    #[tokio::test]
    async fn test_failures_collapse_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "object"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"q": "object"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        for phrase in ["down", "garbage", "object"] {
            assert_eq!(client.get_suggestions(phrase, None).await, Ok(vec![]));
        }

        let metrics = client.metrics();
        assert_eq!(metrics.requests(), 3);
        assert_eq!(metrics.successes(), 0);
        assert_eq!(metrics.failures("status"), 1);
        assert_eq!(metrics.failures("parse"), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_still_counts_for_spacing() {
        // Nothing listens on port 9 on the test hosts
        let fetcher = Arc::new(DirectFetch::new(HttpClient::new().unwrap()));
        let client = SuggestionClient::new(fetcher)
            .with_base_url("http://127.0.0.1:9/complete/search")
            .with_min_delay(Duration::from_millis(200));

        let start = Instant::now();
        assert_eq!(client.get_suggestions("a", None).await, Ok(vec![]));
        assert_eq!(client.get_suggestions("b", None).await, Ok(vec![]));

        assert!(start.elapsed() >= Duration::from_millis(190));
        assert_eq!(client.metrics().failures("transport"), 2);
    }

    #[tokio::test]
    async fn test_requests_are_spaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["q", ["x"]])))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server).with_min_delay(Duration::from_millis(150));
        let mut starts = Vec::new();
        for phrase in ["a", "b", "c"] {
            client.get_suggestions(phrase, None).await.unwrap();
            let throttle = client.throttle.lock().await;
            starts.push(throttle.last_request().unwrap());
        }

        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(150));
        }
    }
}
