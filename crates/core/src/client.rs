//! Client for the backend's live search endpoint.
//!
//! `GET {base_url}/api/live_search?q=<query>` returns
//! `{ "officers": [...], "incidents": [...], "vehicles": [...] }`.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::types::SearchResult;

/// Path of the categorized search endpoint, relative to the site origin.
pub const LIVE_SEARCH_PATH: &str = "/api/live_search";

/// Why a live search request produced no result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Anything that can answer a live search query.
///
/// The widget only depends on this trait, so tests and alternative transports can
/// stand in for the HTTP endpoint.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<SearchResult, SearchError>> + Send;
}

/// `reqwest`-backed client for `/api/live_search`.
#[derive(Clone)]
pub struct HttpSearchClient {
    client: Client,
    endpoint: Url,
}

impl HttpSearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let base = Url::parse(base_url).map_err(|e| SearchError::InvalidUrl(e.to_string()))?;
        let endpoint =
            base.join(LIVE_SEARCH_PATH).map_err(|e| SearchError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(&config.base_url, config.timeout)
    }

    /// Full request URL for `query`, with the query percent-encoded.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

impl SearchBackend for HttpSearchClient {
    fn search(&self, query: &str) -> impl Future<Output = Result<SearchResult, SearchError>> + Send {
        let url = self.request_url(query);
        let client = self.client.clone();
        async move {
            debug!(url = %url, "GET live search");
            let response =
                client.get(url).send().await.map_err(|e| SearchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SearchError::Status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| SearchError::Network(e.to_string()))?;
            serde_json::from_slice(&body).map_err(|e| SearchError::Decode(e.to_string()))
        }
    }
}
