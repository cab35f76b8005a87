//! Catalog scraping: HTTP client, HTML parser, and listing models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{CatalogClient, CatalogFetch};
pub use models::{Listing, ScrapeReport};
pub use parser::Parser;
