//! HTTP client for requests to the autocomplete endpoint

use super::error::FetchError;
use super::types::{FetchRequest, FetchResponse};
use super::user_agent::{accept_html, generate_user_agent};
use crate::config::{OutgoingSettings, DEFAULT_USER_AGENT};
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper with browser-like default headers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(settings.request_timeout).map_err(|e| {
            anyhow::anyhow!("invalid request timeout {}: {}", settings.request_timeout, e)
        })?;
        let mut builder = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        let user_agent = match settings.useragent.as_deref() {
            Some("random") => generate_user_agent(),
            Some(ua) => ua.to_string(),
            None => DEFAULT_USER_AGENT.to_string(),
        };

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent,
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Execute a GET request
    pub async fn execute(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a GET request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: FetchRequest,
        timeout: Duration,
    ) -> Result<FetchResponse, FetchError> {
        let mut req_builder = self.client.get(&request.url).timeout(timeout);

        // Later entries replace earlier ones; names compare case-insensitively
        let mut headers: HashMap<String, &str> = HashMap::new();
        headers.insert("user-agent".to_string(), &self.user_agent);
        headers.insert("accept".to_string(), accept_html());
        headers.insert("accept-encoding".to_string(), "gzip, deflate, br");
        for (key, value) in self.extra_headers.iter().chain(request.headers.iter()) {
            headers.insert(key.to_lowercase(), value);
        }

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Read status and body
    async fn parse_response(response: Response) -> Result<FetchResponse, FetchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(FetchResponse { status, text, url })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_random_user_agent() {
        let settings = OutgoingSettings {
            useragent: Some("random".to_string()),
            ..Default::default()
        };
        let client = HttpClient::with_settings(&settings).unwrap();
        assert!(client.user_agent().starts_with("Mozilla/5.0"));
        assert_ne!(client.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_unrepresentable_timeout_is_an_error() {
        for timeout in [f64::NAN, f64::INFINITY, -1.0, 1e300] {
            let settings = OutgoingSettings {
                request_timeout: timeout,
                ..Default::default()
            };
            assert!(HttpClient::with_settings(&settings).is_err(), "{}", timeout);
        }
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complete"))
            .and(query_param("q", "pisos"))
            .and(header_exists("User-Agent"))
            .and(header("X-Test", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = FetchRequest::get(format!("{}/complete", server.uri()))
            .param("q", "pisos")
            .header("X-Test", "1");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text, "ok");
    }

    #[tokio::test]
    async fn test_request_header_replaces_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = FetchRequest::get(server.uri()).header("accept", "application/json");
        let response = client.execute(request).await.unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = FetchRequest::get(server.uri());
        let err = client
            .execute_with_timeout(request, Duration::from_millis(50))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout);
    }
}
