//! Search collaborator client.
//!
//! Thin reqwest client for an external web-search API. The rest of the site
//! treats it as opaque: a query string in, an ordered list of results out.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::SearchConfig;

/// Request timeout for search calls. The collaborator gives no latency
/// guarantees, so the page must not hang on it.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How many results to request per query.
const RESULT_COUNT: u8 = 10;

/// A single search hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub link: String,
    /// Short summary/snippet.
    pub summary: String,
}

/// Errors that can occur while querying the search collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No endpoint or API key configured.
    #[error("search API is not configured")]
    NotConfigured,

    /// Transport-level failure (DNS, connect, timeout, body decode).
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("search API returned status {0}")]
    Api(reqwest::StatusCode),
}

/// Wire format of the search API response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResultDto>,
}

#[derive(Debug, Deserialize)]
struct SearchResultDto {
    #[serde(default)]
    title: String,
    #[serde(alias = "url", default)]
    link: String,
    #[serde(alias = "snippet", default)]
    summary: String,
}

/// Client for the external search API.
#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<SearchClientInner>,
}

struct SearchClientInner {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Create a new search client.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(SearchClientInner {
                client,
                config: config.clone(),
            }),
        }
    }

    /// Whether the client has everything it needs to run queries.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.config.endpoint.is_some() && self.inner.config.api_key.is_some()
    }

    /// Run a search query and return the ordered results.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::NotConfigured` if no endpoint/key is set,
    /// `SearchError::Api` for non-success statuses, and `SearchError::Http`
    /// for transport failures.
    #[instrument(skip(self))]
    pub async fn run_query(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let endpoint = self
            .inner
            .config
            .endpoint
            .as_ref()
            .ok_or(SearchError::NotConfigured)?;
        let api_key = self
            .inner
            .config
            .api_key
            .as_ref()
            .ok_or(SearchError::NotConfigured)?;

        let count = RESULT_COUNT.to_string();
        let response = self
            .inner
            .client
            .get(endpoint)
            .query(&[("q", query), ("count", count.as_str())])
            .header("Authorization", format!("Bearer {}", api_key.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api(status));
        }

        let body: SearchResponse = response.json().await?;
        debug!(results = body.results.len(), "search query completed");

        Ok(body
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                link: r.link,
                summary: r.summary,
            })
            .collect())
    }
}
