//! HTML parser for catalog listing pages.

use crate::catalog::models::Listing;
use crate::catalog::selectors;
use anyhow::Result;
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};

/// Parser for catalog HTML pages.
pub struct Parser {
    base_url: String,
    max_listings: usize,
}

impl Parser {
    /// Creates a new parser resolving relative links against `base_url`.
    pub fn new(base_url: impl Into<String>, max_listings: usize) -> Self {
        Self { base_url: base_url.into(), max_listings }
    }

    /// Parses a catalog page into structured listings.
    ///
    /// A card that fails to parse is skipped, never fatal. At most
    /// `max_listings` cards are taken from one page.
    pub fn parse_page(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);

        if document.select(&selectors::NO_RESULTS).next().is_some() {
            debug!("Page carries a no-results marker");
            return Ok(Vec::new());
        }

        let total = document.select(&selectors::CARD).count();

        let mut listings = Vec::new();
        for element in document.select(&selectors::CARD).take(self.max_listings) {
            match self.parse_card(element) {
                Some(listing) => {
                    trace!("Parsed listing: {} - {}", listing.title, listing.price);
                    listings.push(listing);
                }
                None => {
                    warn!("Skipping card without a product link");
                }
            }
        }

        debug!("Parsed {} of {} cards on page", listings.len(), total);

        Ok(listings)
    }

    /// Parses a single product card. Returns None when the card has no link.
    fn parse_card(&self, element: ElementRef) -> Option<Listing> {
        let link = element.select(&selectors::CORE_LINK).next()?;

        // Name from the data attribute, falling back to the visible title
        let title = link
            .value()
            .attr(selectors::NAME_ATTR)
            .map(str::to_string)
            .or_else(|| {
                element
                    .select(&selectors::NAME)
                    .next()
                    .map(|e| e.text().collect::<String>().trim().to_string())
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        // Resolve relative links against the base URL
        let url = link
            .value()
            .attr("href")
            .map(|href| {
                if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{}{}", self.base_url, href)
                }
            })
            .unwrap_or_else(|| self.base_url.clone());

        // An unparseable price degrades to 0.0 and keeps the listing
        let price = element
            .select(&selectors::PRICE)
            .next()
            .and_then(|e| parse_price_value(&e.text().collect::<String>()))
            .unwrap_or(0.0);

        let old_price = element
            .select(&selectors::OLD_PRICE)
            .next()
            .and_then(|e| parse_price_value(&e.text().collect::<String>()));

        Some(Listing { title, price, url, old_price })
    }
}

/// Parses a price value from text like "₦ 129,000" or "₦ 84,999.50",
/// stripping currency symbols and thousands separators.
pub fn parse_price_value(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}
