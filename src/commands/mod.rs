//! Command implementations for the CLI.

pub mod bench;
pub mod scrape;
pub mod serve;

pub use bench::BenchCommand;
pub use scrape::{ScrapeCommand, ScrapeTarget};
pub use serve::ServeCommand;
