//! Benchmark command implementations.

use crate::bench::report::BenchReport;
use crate::bench::strategy::ExecStrategy;
use crate::bench::{cpu, io, micro};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs the benchmark suites and formats their reports.
pub struct BenchCommand {
    config: Config,
}

impl BenchCommand {
    /// Creates a new bench command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// CPU-bound suite: one strategy, or the full comparison when none given.
    pub fn execute_cpu(&self, strategy: Option<ExecStrategy>) -> Result<String> {
        let iterations = self.config.iterations;
        let workers = self.config.workers;
        info!("CPU bench: {} iterations, {} workers", iterations, workers);

        let report = match strategy {
            Some(strategy) => BenchReport::new("cpu", vec![cpu::run(strategy, iterations, workers)?]),
            None => cpu::compare(iterations, workers)?,
        };

        Ok(self.render(&report))
    }

    /// I/O-bound suite: generate dummy files, read them back, clean up.
    pub fn execute_io(&self, strategy: Option<ExecStrategy>, keep_files: bool) -> Result<String> {
        let dir = &self.config.data_dir;
        info!(
            "I/O bench: {} files x {} KiB in {}",
            self.config.file_count,
            self.config.file_size_kb,
            dir.display()
        );

        let paths = io::generate(dir, self.config.file_count, self.config.file_size_kb)?;

        let result = match strategy {
            Some(strategy) => io::run(strategy, &paths, self.config.workers)
                .map(|run| BenchReport::new("io", vec![run])),
            None => io::compare(&paths, self.config.workers),
        };

        if !keep_files {
            cleanup(&paths);
        }

        let report = result?;
        Ok(self.render(&report))
    }

    /// Micro-optimization suite.
    pub fn execute_micro(&self, pieces: usize, items: u64) -> Result<String> {
        info!("Micro bench: {} string pieces, {} summed items", pieces, items);
        let report = micro::run(pieces, items);
        Ok(self.render(&report))
    }

    fn render(&self, report: &BenchReport) -> String {
        let formatter = Formatter::new(self.config.format);
        formatter.format_bench(report)
    }
}

/// Best-effort removal of generated benchmark files.
fn cleanup(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Runs one CPU partition on behalf of the process pool and prints the
/// checksum to stdout. Invoked via the hidden worker subcommand.
pub fn cpu_worker(start: u64, len: u64) -> Result<()> {
    let checksum = cpu::sum_of_squares(start, len);
    println!("{}", checksum);
    Ok(())
}

/// Reads each file on behalf of the process pool, printing one
/// `ok <bytes>` or `err 0` line per path in argument order.
pub fn io_worker(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let result = io::read_file(path);
        let status = if result.ok { "ok" } else { "err" };
        println!("{} {}", status, result.bytes);
    }
    Ok(())
}
