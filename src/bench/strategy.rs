//! Execution strategies for dispatching benchmark workloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a partitioned workload is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecStrategy {
    /// Every work item runs on the calling thread.
    Sequential,
    /// A fixed pool of worker threads, results collected over a channel.
    #[default]
    Threads,
    /// A fixed pool of child processes of the current executable.
    Processes,
}

impl ExecStrategy {
    /// Returns all supported strategies, baseline first.
    pub fn all() -> &'static [ExecStrategy] {
        &[ExecStrategy::Sequential, ExecStrategy::Threads, ExecStrategy::Processes]
    }

    /// Short human description shown by the `strategies` listing.
    pub fn description(&self) -> &'static str {
        match self {
            ExecStrategy::Sequential => "single-threaded baseline",
            ExecStrategy::Threads => "fixed thread pool, channel collection",
            ExecStrategy::Processes => "fixed pool of worker child processes",
        }
    }
}

impl FromStr for ExecStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecStrategy::Sequential),
            "threads" | "thread" => Ok(ExecStrategy::Threads),
            "processes" | "process" => Ok(ExecStrategy::Processes),
            _ => Err(format!("Unknown strategy: {}. Use: sequential, threads, processes", s)),
        }
    }
}

impl fmt::Display for ExecStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecStrategy::Sequential => write!(f, "sequential"),
            ExecStrategy::Threads => write!(f, "threads"),
            ExecStrategy::Processes => write!(f, "processes"),
        }
    }
}
