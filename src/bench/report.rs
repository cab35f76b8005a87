//! Timing reports produced by the benchmark runners.

use serde::Serialize;
use std::time::Duration;

/// One measured run: a labeled workload dispatched under some configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BenchRun {
    /// Workload/variant label, e.g. `cpu/threads` or `string/join`.
    pub label: String,
    /// Worker pool size used for the run.
    pub workers: usize,
    /// Number of dispatched tasks.
    pub tasks: usize,
    /// Tasks that completed with a degraded (sentinel) result.
    pub failures: usize,
    /// Wall-clock time in seconds.
    pub elapsed_secs: f64,
    /// Order-independent checksum of the produced results.
    pub checksum: u64,
}

impl BenchRun {
    /// Creates a run record from a measured duration.
    pub fn new(
        label: impl Into<String>,
        workers: usize,
        tasks: usize,
        failures: usize,
        elapsed: Duration,
        checksum: u64,
    ) -> Self {
        Self {
            label: label.into(),
            workers,
            tasks,
            failures,
            elapsed_secs: elapsed.as_secs_f64(),
            checksum,
        }
    }

    /// Tasks completed per second, 0.0 for an instantaneous run.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.tasks as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

/// A group of runs over the same workload, compared against a baseline.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Workload name, e.g. `cpu` or `io`.
    pub name: String,
    /// Individual runs; the first run is the comparison baseline.
    pub runs: Vec<BenchRun>,
}

impl BenchReport {
    /// Creates a report over the given runs.
    pub fn new(name: impl Into<String>, runs: Vec<BenchRun>) -> Self {
        Self { name: name.into(), runs }
    }

    /// Returns the baseline run, if any.
    pub fn baseline(&self) -> Option<&BenchRun> {
        self.runs.first()
    }

    /// Speedup of a run relative to the baseline (>1.0 means faster).
    pub fn speedup(&self, run: &BenchRun) -> Option<f64> {
        let baseline = self.baseline()?;
        if run.elapsed_secs > 0.0 {
            Some(baseline.elapsed_secs / run.elapsed_secs)
        } else {
            None
        }
    }

    /// True when every run produced the same checksum.
    pub fn checksums_agree(&self) -> bool {
        match self.runs.first() {
            Some(first) => self.runs.iter().all(|r| r.checksum == first.checksum),
            None => true,
        }
    }
}
