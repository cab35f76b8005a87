//! CSS selectors for catalog HTML parsing.
//!
//! All selectors used for parsing catalog pages live here.
//! Update this file when the site changes its HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Product card container on a catalog listing page.
pub static CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article.prd").unwrap());

/// Main product link inside a card; carries the title attribute and href.
pub static CORE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.core").unwrap());

/// Attribute on the core link holding the product name.
pub static NAME_ATTR: &str = "data-ga4-item_name";

/// Product name element, fallback when the name attribute is missing.
pub static NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3.name").unwrap());

/// Current price text, e.g. "₦ 129,000".
pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.prc").unwrap());

/// Struck-through previous price, when the item is discounted.
pub static OLD_PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.old").unwrap());

/// "No results" marker on an empty catalog page.
pub static NO_RESULTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".-no-results, \
         section.catalog-empty",
    )
    .unwrap_or_else(|_| Selector::parse(".-no-results").unwrap())
});
