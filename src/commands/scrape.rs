//! Scrape command implementation.

use crate::catalog::models::{Listing, ScrapeReport};
use crate::catalog::{CatalogClient, CatalogFetch, Parser};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What one scrape run should fetch.
#[derive(Debug, Clone)]
pub enum ScrapeTarget {
    /// Explicit catalog page URLs.
    Urls(Vec<String>),
    /// A search query fanned out over the first `pages` result pages.
    Query { query: String, pages: u32 },
}

/// Executes a concurrent catalog scrape and price analysis.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the scrape and returns formatted output.
    pub async fn execute(&self, target: ScrapeTarget) -> Result<String> {
        let client =
            Arc::new(CatalogClient::new(&self.config).context("Failed to create HTTP client")?);

        self.execute_with_client(client, target).await
    }

    /// Executes the scrape with a provided client (for testing).
    pub async fn execute_with_client<C>(
        &self,
        client: Arc<C>,
        target: ScrapeTarget,
    ) -> Result<String>
    where
        C: CatalogFetch + 'static,
    {
        let report = self.collect(client, target).await?;

        info!(
            "Collected {} listings ({} fetch failures)",
            report.count(),
            report.failures
        );

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_scrape(&report))
    }

    /// Fetches every page on a bounded pool of tasks and parses the results.
    async fn collect<C>(&self, client: Arc<C>, target: ScrapeTarget) -> Result<ScrapeReport>
    where
        C: CatalogFetch + 'static,
    {
        let parser = Arc::new(Parser::new(client.base_url(), self.config.max_listings));
        let query = match &target {
            ScrapeTarget::Query { query, .. } => Some(query.clone()),
            ScrapeTarget::Urls(_) => None,
        };

        let started = Instant::now();

        // Pool size is the configured worker count; the semaphore is the
        // admission gate for the spawned tasks.
        let permits = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks: JoinSet<Option<Vec<Listing>>> = JoinSet::new();

        match target {
            ScrapeTarget::Urls(urls) => {
                for url in urls {
                    let client = client.clone();
                    let parser = parser.clone();
                    let permits = permits.clone();

                    tasks.spawn(async move {
                        let _permit = permits.acquire_owned().await.ok()?;
                        fetch_and_parse(&*client, &parser, Page::Url(url)).await
                    });
                }
            }
            ScrapeTarget::Query { query, pages } => {
                for page in 1..=pages.max(1) {
                    let client = client.clone();
                    let parser = parser.clone();
                    let permits = permits.clone();
                    let query = query.clone();

                    tasks.spawn(async move {
                        let _permit = permits.acquire_owned().await.ok()?;
                        fetch_and_parse(&*client, &parser, Page::Search { query, page }).await
                    });
                }
            }
        }

        // Collect in completion order; a failed fetch was already logged and
        // shows up as None.
        let mut listings = Vec::new();
        let mut pages_ok = 0usize;
        let mut failures = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(page_listings)) => {
                    pages_ok += 1;
                    listings.extend(page_listings);
                }
                Ok(None) => failures += 1,
                Err(e) => {
                    warn!("Scrape task panicked: {}", e);
                    failures += 1;
                }
            }
        }

        let elapsed = started.elapsed();
        debug!("Scrape finished in {:.3}s", elapsed.as_secs_f64());

        Ok(ScrapeReport::new(query, listings, pages_ok, failures, elapsed.as_secs_f64()))
    }
}

/// One unit of fetch work.
enum Page {
    Url(String),
    Search { query: String, page: u32 },
}

/// Fetches one page and parses it. Failures degrade to None, never abort the run.
async fn fetch_and_parse<C>(client: &C, parser: &Parser, page: Page) -> Option<Vec<Listing>>
where
    C: CatalogFetch + ?Sized,
{
    let html = match &page {
        Page::Url(url) => client.page(url).await,
        Page::Search { query, page } => client.search(query, *page).await,
    };

    let html = match html {
        Ok(html) => html,
        Err(e) => {
            warn!("Fetch failed: {}", e);
            return None;
        }
    };

    match parser.parse_page(&html) {
        Ok(listings) => Some(listings),
        Err(e) => {
            warn!("Parse failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock catalog client serving canned pages.
    struct MockCatalogClient {
        pages: Vec<String>,
        call_count: AtomicU32,
        fail_all: bool,
    }

    impl MockCatalogClient {
        fn new(pages: Vec<String>) -> Self {
            Self { pages, call_count: AtomicU32::new(0), fail_all: false }
        }

        fn failing() -> Self {
            Self { pages: Vec::new(), call_count: AtomicU32::new(0), fail_all: true }
        }
    }

    #[async_trait]
    impl CatalogFetch for MockCatalogClient {
        async fn page(&self, _url: &str) -> Result<String> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst) as usize;
            if self.fail_all {
                anyhow::bail!("Simulated network error")
            }
            Ok(self.pages.get(idx % self.pages.len()).cloned().unwrap_or_default())
        }

        async fn search(&self, _query: &str, page: u32) -> Result<String> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_all {
                anyhow::bail!("Simulated network error")
            }
            let idx = (page - 1) as usize;
            Ok(self.pages.get(idx).cloned().unwrap_or_default())
        }

        fn base_url(&self) -> &str {
            "https://catalog.example.com"
        }
    }

    fn make_test_config() -> Config {
        Config {
            workers: 2,
            delay_ms: 0,
            delay_jitter_ms: 0,
            format: OutputFormat::Table,
            max_listings: 10,
            ..Config::default()
        }
    }

    fn make_page_html(items: &[(&str, &str)]) -> String {
        let cards: String = items
            .iter()
            .map(|(name, price)| {
                format!(
                    r#"<article class="prd"><a class="core" href="/{}.html"
                        data-ga4-item_name="{}"><div class="prc">{}</div></a></article>"#,
                    name.to_lowercase().replace(' ', "-"),
                    name,
                    price
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", cards)
    }

    #[tokio::test]
    async fn test_scrape_urls_basic() {
        let html = make_page_html(&[("TV One", "₦ 100,000"), ("TV Two", "₦ 200,000")]);
        let client = Arc::new(MockCatalogClient::new(vec![html]));
        let cmd = ScrapeCommand::new(make_test_config());

        let target = ScrapeTarget::Urls(vec!["https://catalog.example.com/tv/".to_string()]);
        let output = cmd.execute_with_client(client, target).await.unwrap();

        assert!(output.contains("TV One"));
        assert!(output.contains("TV Two"));
        assert!(output.contains("mean 150000.00"));
    }

    #[tokio::test]
    async fn test_scrape_query_fans_out_pages() {
        let page1 = make_page_html(&[("TV One", "₦ 10,000")]);
        let page2 = make_page_html(&[("TV Two", "₦ 20,000")]);
        let client = Arc::new(MockCatalogClient::new(vec![page1, page2]));
        let cmd = ScrapeCommand::new(make_test_config());

        let target = ScrapeTarget::Query { query: "tv".to_string(), pages: 2 };
        let output = cmd.execute_with_client(client.clone(), target).await.unwrap();

        assert_eq!(client.call_count.load(Ordering::SeqCst), 2);
        assert!(output.contains("TV One"));
        assert!(output.contains("TV Two"));
    }

    #[tokio::test]
    async fn test_scrape_all_fetches_fail() {
        let client = Arc::new(MockCatalogClient::failing());
        let cmd = ScrapeCommand::new(make_test_config());

        let target = ScrapeTarget::Urls(vec![
            "https://catalog.example.com/a/".to_string(),
            "https://catalog.example.com/b/".to_string(),
        ]);
        let output = cmd.execute_with_client(client, target).await.unwrap();

        // Degraded, not fatal
        assert!(output.contains("No listings found."));
    }

    #[tokio::test]
    async fn test_scrape_partial_failure_json() {
        let html = make_page_html(&[("TV One", "₦ 10,000")]);
        // One good page then empty responses
        let client = Arc::new(MockCatalogClient::new(vec![html, String::new()]));

        let mut config = make_test_config();
        config.format = OutputFormat::Json;
        let cmd = ScrapeCommand::new(config);

        let target = ScrapeTarget::Query { query: "tv".to_string(), pages: 2 };
        let output = cmd.execute_with_client(client, target).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["query"], "tv");
        assert_eq!(json["pages"], 2);
        assert_eq!(json["failures"], 0);
        assert_eq!(json["listings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scrape_respects_max_listings() {
        let items: Vec<(String, String)> =
            (0..20).map(|i| (format!("TV {}", i), "₦ 1,000".to_string())).collect();
        let refs: Vec<(&str, &str)> =
            items.iter().map(|(n, p)| (n.as_str(), p.as_str())).collect();
        let html = make_page_html(&refs);

        let mut config = make_test_config();
        config.max_listings = 5;
        config.format = OutputFormat::Json;
        let cmd = ScrapeCommand::new(config);

        let client = Arc::new(MockCatalogClient::new(vec![html]));
        let target = ScrapeTarget::Urls(vec!["https://catalog.example.com/tv/".to_string()]);
        let output = cmd.execute_with_client(client, target).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["listings"].as_array().unwrap().len(), 5);
    }
}
