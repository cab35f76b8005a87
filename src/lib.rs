//! loadlab - Concurrent workload benchmarking and catalog scraping toolkit
//!
//! One CLI for comparing execution strategies on CPU-bound and I/O-bound
//! workloads, scraping catalog listings concurrently with price statistics,
//! and serving a CSV-to-JSON conversion endpoint.

pub mod bench;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod server;
pub mod stats;

pub use bench::report::{BenchReport, BenchRun};
pub use bench::strategy::ExecStrategy;
pub use catalog::models::{Listing, ScrapeReport};
pub use config::Config;
pub use stats::PriceStats;
