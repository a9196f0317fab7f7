//! Request and response types passed through the fetchers

use super::error::FetchError;
use std::collections::HashMap;

/// HTTP GET to be issued by a fetcher
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// URL without query string
    pub url: String,
    /// Query parameters, in the order they are sent
    pub params: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl FetchRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            headers: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Value of the first parameter with this name
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response body and status
#[derive(Debug)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl FetchResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an error
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status(self.status))
        }
    }

    /// Check if response indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_keep_order() {
        let request = FetchRequest::get("http://localhost/complete")
            .param("client", "chrome")
            .param("q", "pisos")
            .param("ds", "");
        let keys: Vec<&str> = request.params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["client", "q", "ds"]);
        assert_eq!(request.param_value("ds"), Some(""));
        assert_eq!(request.param_value("uule"), None);
    }

    #[test]
    fn test_status_checks() {
        let ok = FetchResponse { status: 204, text: String::new(), url: String::new() };
        assert!(ok.error_for_status().is_ok());

        let limited = FetchResponse { status: 429, text: String::new(), url: String::new() };
        assert!(limited.is_rate_limited());
        assert_eq!(limited.error_for_status().unwrap_err(), FetchError::Status(429));
    }
}
