//! CPU-bound workload: partitioned sum-of-squares under each execution strategy.

use crate::bench::report::{BenchReport, BenchRun};
use crate::bench::strategy::ExecStrategy;
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::debug;

/// Sums squares over the half-open range `[start, start + len)` with wrapping
/// arithmetic. The result is a checksum, not a mathematical sum: wrapping keeps
/// it order-independent and overflow-proof for large ranges.
pub fn sum_of_squares(start: u64, len: u64) -> u64 {
    let mut acc: u64 = 0;
    for i in start..start.saturating_add(len) {
        acc = acc.wrapping_add(i.wrapping_mul(i));
    }
    std::hint::black_box(acc)
}

/// Splits `total` iterations into `workers` contiguous partitions starting at 1.
/// The remainder lands in the last partition so the sizes always sum to `total`.
pub fn partition(total: u64, workers: usize) -> Vec<(u64, u64)> {
    let workers = workers.max(1) as u64;
    let base = total / workers;
    let mut parts = Vec::with_capacity(workers as usize);
    let mut start = 1u64;

    for i in 0..workers {
        let len = if i == workers - 1 { total - base * (workers - 1) } else { base };
        parts.push((start, len));
        start += len;
    }

    parts
}

/// Runs the workload under one strategy and records the elapsed wall-clock time.
pub fn run(strategy: ExecStrategy, iterations: u64, workers: usize) -> Result<BenchRun> {
    let workers = workers.max(1);
    let parts = partition(iterations, workers);
    debug!("cpu bench: {} iterations across {} partitions ({})", iterations, parts.len(), strategy);

    let started = Instant::now();
    let checksum = match strategy {
        ExecStrategy::Sequential => run_sequential(&parts),
        ExecStrategy::Threads => run_threads(&parts)?,
        ExecStrategy::Processes => run_processes(&parts)?,
    };
    let elapsed = started.elapsed();

    Ok(BenchRun::new(format!("cpu/{}", strategy), workers, parts.len(), 0, elapsed, checksum))
}

/// Runs the workload under every strategy and reports against the sequential baseline.
pub fn compare(iterations: u64, workers: usize) -> Result<BenchReport> {
    let mut runs = Vec::new();
    for strategy in ExecStrategy::all() {
        runs.push(run(*strategy, iterations, workers)?);
    }
    Ok(BenchReport::new("cpu", runs))
}

fn run_sequential(parts: &[(u64, u64)]) -> u64 {
    parts.iter().fold(0u64, |acc, &(start, len)| acc.wrapping_add(sum_of_squares(start, len)))
}

/// One thread per partition; results come back over a channel in completion
/// order. The channel replaces any shared mutable result list.
fn run_threads(parts: &[(u64, u64)]) -> Result<u64> {
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for &(start, len) in parts {
            let tx = tx.clone();
            scope.spawn(move || {
                // A send only fails if the receiver is gone, which cannot
                // happen while this scope is alive.
                let _ = tx.send(sum_of_squares(start, len));
            });
        }
    });
    drop(tx);

    let mut checksum = 0u64;
    let mut collected = 0usize;
    for part in rx {
        checksum = checksum.wrapping_add(part);
        collected += 1;
    }

    anyhow::ensure!(collected == parts.len(), "collected {} of {} partitions", collected, parts.len());
    Ok(checksum)
}

/// One child process per partition. Each child re-invokes the current
/// executable with the hidden worker subcommand and prints its checksum.
fn run_processes(parts: &[(u64, u64)]) -> Result<u64> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;

    let mut children = Vec::with_capacity(parts.len());
    for &(start, len) in parts {
        let child = Command::new(&exe)
            .arg("worker")
            .arg("cpu")
            .arg("--start")
            .arg(start.to_string())
            .arg("--len")
            .arg(len.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn cpu worker process")?;
        children.push(child);
    }

    let mut checksum = 0u64;
    for child in children {
        let output = child.wait_with_output().context("Failed to wait for cpu worker")?;
        anyhow::ensure!(output.status.success(), "cpu worker exited with {}", output.status);

        let text = String::from_utf8(output.stdout).context("cpu worker wrote invalid UTF-8")?;
        let part: u64 = text.trim().parse().context("cpu worker wrote an invalid checksum")?;
        checksum = checksum.wrapping_add(part);
    }

    Ok(checksum)
}
