//! HTTP networking module
//!
//! Provides the HTTP client and the JSON fetchers used to reach the
//! autocomplete endpoint.

mod client;
mod error;
mod fetcher;
mod types;
mod user_agent;

pub use client::HttpClient;
pub use error::FetchError;
pub use fetcher::{
    fetcher_for, is_valid_callback_prefix, unwrap_jsonp, CallbackFetch, DirectFetch,
    HttpJsonFetcher,
};
pub use types::{FetchRequest, FetchResponse};
pub use user_agent::{accept_html, accept_json, generate_user_agent};
