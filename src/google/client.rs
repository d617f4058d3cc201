//! HTTP client for the Google Custom Search JSON API.

use crate::config::Config;
use crate::error::Error;
use crate::listing::RawListing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const GOOGLE_API_BASE: &str = "https://www.googleapis.com";

/// One page of the Custom Search response. Only the fields the pipeline
/// consumes are deserialized.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawListing>,
}

/// Trait for the search collaborator - enables mocking for tests.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetches one page of results. `start` is the 1-based index of the
    /// first result on the page.
    async fn search(&self, query: &str, start: u32) -> Result<Vec<RawListing>>;

    /// Number of results requested per page.
    fn page_size(&self) -> u32;
}

/// Google Custom Search client.
pub struct GoogleClient {
    client: Client,
    api_key: String,
    search_engine_id: String,
    page_size: u32,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl GoogleClient {
    /// Creates a new client from configuration. Missing credentials are
    /// a configuration error, surfaced before any request is made.
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional custom base URL (for
    /// testing).
    pub fn with_base_url(
        config: &Config,
        base_url: Option<String>,
    ) -> crate::error::Result<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty());
        let search_engine_id = config.search_engine_id.clone().filter(|c| !c.is_empty());
        let (api_key, search_engine_id) = match (api_key, search_engine_id) {
            (Some(k), Some(c)) => (k, c),
            _ => return Err(Error::MissingCredentials),
        };

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::Transport(anyhow::Error::new(e)))?;
            builder = builder.proxy(proxy);
        }

        let client =
            builder.build().map_err(|e| Error::Transport(anyhow::Error::new(e)))?;

        Ok(Self {
            client,
            api_key,
            search_engine_id,
            page_size: config.page_size,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GOOGLE_API_BASE)
    }

    /// Adds a polite delay between paginated requests.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl SearchApi for GoogleClient {
    async fn search(&self, query: &str, start: u32) -> Result<Vec<RawListing>> {
        if start > 1 {
            self.delay().await;
        }

        let url = format!("{}/customsearch/v1", self.base_url());
        info!("Searching: {} (start {})", query, start);

        let num = self.page_size.to_string();
        let start_index = start.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("start", start_index.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Search API quota exhausted (429).");
            anyhow::bail!("Search API quota exhausted. Try again later.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        let parsed: SearchResponse =
            response.json().await.context("Failed to parse search response")?;

        Ok(parsed.items)
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            search_engine_id: Some("test-cx".to_string()),
            delay_ms: 0,
            delay_jitter_ms: 0,
            ..Config::default()
        }
    }

    fn items_body(items: &[(&str, &str, &str)]) -> serde_json::Value {
        serde_json::json!({
            "items": items
                .iter()
                .map(|(title, snippet, link)| {
                    serde_json::json!({"title": title, "snippet": snippet, "link": link})
                })
                .collect::<Vec<_>>()
        })
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut config = make_test_config();
        config.api_key = None;
        assert!(matches!(
            GoogleClient::new(&config),
            Err(Error::MissingCredentials)
        ));

        let mut config = make_test_config();
        config.search_engine_id = Some(String::new());
        assert!(matches!(
            GoogleClient::new(&config),
            Err(Error::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock_server = MockServer::start().await;

        let body = items_body(&[(
            "iPhone 14 Pro bekas",
            "harga 15.000.000",
            "https://tokopedia.com/a",
        )]);

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .and(query_param("q", "harga iphone"))
            .and(query_param("num", "10"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let items = client.search("harga iphone", 1).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "iPhone 14 Pro bekas");
        assert_eq!(items[0].link, "https://tokopedia.com/a");
    }

    #[tokio::test]
    async fn test_search_pagination_offset() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("start", "11"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(items_body(&[("page two", "", "https://x/2")])),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let items = client.search("q", 11).await.unwrap();
        assert_eq!(items[0].title, "page two");
    }

    #[tokio::test]
    async fn test_empty_page_when_items_missing() {
        let mock_server = MockServer::start().await;

        // The API omits "items" entirely on an empty page.
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"kind": "customsearch#search"})),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let items = client.search("q", 1).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_quota_exhausted_429() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.search("q", 1).await.unwrap_err();
        assert!(err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn test_http_error_403() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.search("q", 1).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client =
            GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.search("q", 1).await.unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[tokio::test]
    async fn test_page_size_reported() {
        let config = make_test_config();
        let client = GoogleClient::with_base_url(&config, Some("http://localhost".into()))
            .unwrap();
        assert_eq!(client.page_size(), 10);
    }
}
