//! HTTP client for catalog requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for catalog page fetching - enables mocking for tests.
#[async_trait]
pub trait CatalogFetch: Send + Sync {
    /// Fetches an arbitrary catalog page and returns the HTML response.
    async fn page(&self, url: &str) -> Result<String>;

    /// Fetches one page of search results for a query.
    async fn search(&self, query: &str, page: u32) -> Result<String>;

    /// Returns the base URL this client is pointed at.
    fn base_url(&self) -> &str;
}

/// Catalog HTTP client with browser impersonation and polite request pacing.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl CatalogClient {
    /// Creates a new catalog client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            // One fixed timeout, no retries
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Performs a GET request with browser emulation headers.
    async fn get(&self, url: &str) -> Result<String> {
        // Add human-like delay with jitter
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing delay.");
            anyhow::bail!("Rate limited by the catalog site. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Adds a random delay to mimic human behavior.
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
impl CatalogFetch for CatalogClient {
    async fn page(&self, url: &str) -> Result<String> {
        info!("Fetching page: {}", url);
        self.get(url).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<String> {
        let url = format!(
            "{}/catalog/?q={}&page={}",
            self.base_url,
            urlencoding::encode(query),
            page
        );

        info!("Searching: {} (page {})", query, page);
        self.get(&url).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            delay_ms: 0,        // No delay for tests
            delay_jitter_ms: 0, // No jitter for tests
            ..Config::default()
        }
    }

    #[test]
    fn test_url_encoding() {
        let query = "led tv 55";
        let encoded = urlencoding::encode(query);
        assert_eq!(encoded, "led%20tv%2055");
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_stripped() {
        let config = make_test_config("https://catalog.example.com/");
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://catalog.example.com");
    }

    #[tokio::test]
    async fn test_page_success() {
        let mock_server = MockServer::start().await;

        let html = r#"
            <html><body>
                <article class="prd"><a class="core" href="/tv-1.html"
                    data-ga4-item_name="Test TV"><div class="prc">₦ 129,000</div></a></article>
            </body></html>
        "#;

        Mock::given(method("GET"))
            .and(path("/televisions/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.page(&format!("{}/televisions/", mock_server.uri())).await;
        assert!(result.is_ok());
        let body = result.unwrap();
        assert!(body.contains("Test TV"));
        assert!(body.contains("129,000"));
    }

    #[tokio::test]
    async fn test_search_builds_query_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/catalog/"))
            .and(query_param("q", "led tv"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>page 2</html>"))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.search("led tv", 2).await;
        assert!(result.is_ok());
        assert!(result.unwrap().contains("page 2"));
    }

    #[tokio::test]
    async fn test_rate_limited_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/catalog/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.search("tv", 1).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Rate limited"));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gone/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.page(&format!("{}/gone/", mock_server.uri())).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("404"));
    }

    #[tokio::test]
    async fn test_http_error_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/catalog/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.search("tv", 1).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("500"));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/catalog/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.search("tv", 1).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_with_special_characters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/catalog/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let client = CatalogClient::new(&config).unwrap();

        let result = client.search("tv & decoder 43\"", 1).await;
        assert!(result.is_ok());
    }
}
