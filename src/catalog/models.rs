//! Data models for scraped catalog listings.

use crate::stats::PriceStats;
use serde::{Deserialize, Serialize};

/// A single product listing scraped from a catalog page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Product title
    pub title: String,
    /// Current price; 0.0 when the price could not be parsed
    pub price: f64,
    /// Full product URL
    pub url: String,
    /// Previous price for discounted items
    pub old_price: Option<f64>,
}

impl Listing {
    /// Creates a listing without discount information.
    pub fn new(title: impl Into<String>, price: f64, url: impl Into<String>) -> Self {
        Self { title: title.into(), price, url: url.into(), old_price: None }
    }

    /// Returns true when a usable price was extracted.
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }

    /// Returns discount percentage if the item was marked down.
    pub fn discount_percent(&self) -> Option<u8> {
        self.old_price.and_then(|old| {
            if old <= self.price {
                return None;
            }
            let discount = ((old - self.price) / old * 100.0).round() as u8;
            Some(discount.min(99))
        })
    }
}

/// Result of one scrape run: everything collected plus fetch bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Search query, when the run was query-driven
    pub query: Option<String>,
    /// Listings in collection order
    pub listings: Vec<Listing>,
    /// Statistics over the listing prices
    pub stats: PriceStats,
    /// Pages fetched successfully
    pub pages: usize,
    /// Fetches that failed and were skipped
    pub failures: usize,
    /// Wall-clock time of the whole run in seconds
    pub elapsed_secs: f64,
}

impl ScrapeReport {
    /// Creates a report and computes the price statistics from the listings.
    pub fn new(
        query: Option<String>,
        listings: Vec<Listing>,
        pages: usize,
        failures: usize,
        elapsed_secs: f64,
    ) -> Self {
        let prices: Vec<f64> = listings.iter().map(|l| l.price).collect();
        let stats = PriceStats::from_prices(&prices);
        Self { query, listings, stats, pages, failures, elapsed_secs }
    }

    /// Returns number of listings.
    pub fn count(&self) -> usize {
        self.listings.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_listing(price: f64) -> Listing {
        Listing::new("Test TV", price, "https://example.com/tv-1.html")
    }

    #[test]
    fn test_listing_has_price() {
        assert!(make_listing(100.0).has_price());
        assert!(!make_listing(0.0).has_price());
        assert!(!make_listing(-1.0).has_price());
    }

    #[test]
    fn test_discount_percent() {
        let mut listing = make_listing(50.0);
        listing.old_price = Some(100.0);
        assert_eq!(listing.discount_percent(), Some(50));

        // No old price
        assert!(make_listing(50.0).discount_percent().is_none());

        // Old price not actually higher
        let mut listing = make_listing(50.0);
        listing.old_price = Some(40.0);
        assert!(listing.discount_percent().is_none());
    }

    #[test]
    fn test_discount_percent_clamping() {
        let mut listing = make_listing(1.0);
        listing.old_price = Some(1000.0);
        assert_eq!(listing.discount_percent(), Some(99));
    }

    #[test]
    fn test_report_computes_stats() {
        let listings = vec![make_listing(10.0), make_listing(20.0), make_listing(0.0)];
        let report = ScrapeReport::new(Some("tv".to_string()), listings, 1, 0, 0.5);

        assert_eq!(report.count(), 3);
        assert!(!report.is_empty());
        // The 0.0 sentinel price is excluded from the sample
        assert_eq!(report.stats.count, 2);
        assert_eq!(report.stats.mean, 15.0);
    }

    #[test]
    fn test_report_empty() {
        let report = ScrapeReport::new(None, Vec::new(), 0, 2, 0.1);
        assert!(report.is_empty());
        assert_eq!(report.failures, 2);
        assert_eq!(report.stats.count, 0);
    }

    #[test]
    fn test_listing_serde() {
        let listing = make_listing(129_000.0);
        let json = serde_json::to_string(&listing).unwrap();
        assert!(json.contains("Test TV"));

        let parsed: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, listing.title);
        assert_eq!(parsed.price, listing.price);
    }
}
