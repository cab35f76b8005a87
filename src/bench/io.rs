//! I/O-bound workload: generate dummy files, read them back under a strategy.

use crate::bench::report::{BenchReport, BenchRun};
use crate::bench::strategy::ExecStrategy;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// Content chunk written repeatedly when generating dummy files.
const CHUNK: [u8; 1024] = [b'K'; 1024];

/// Result of reading one file: byte count plus whether the read succeeded.
/// A failed read is recorded as 0 bytes, mirroring the sentinel-zero contract.
#[derive(Debug, Clone, Copy)]
pub struct ReadResult {
    pub bytes: u64,
    pub ok: bool,
}

/// Creates `count` files of `size_kb` KiB each under `dir` and returns their paths.
pub fn generate(dir: &Path, count: usize, size_kb: usize) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        let path = dir.join(format!("dummy{:04}.dat", i + 1));
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        for _ in 0..size_kb {
            file.write_all(&CHUNK)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        debug!("Created {} ({} KiB)", path.display(), size_kb);
        paths.push(path);
    }

    Ok(paths)
}

/// Reads one file fully and returns its byte count; errors degrade to zero.
pub fn read_file(path: &Path) -> ReadResult {
    match fs::read(path) {
        Ok(contents) => ReadResult { bytes: contents.len() as u64, ok: true },
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            ReadResult { bytes: 0, ok: false }
        }
    }
}

/// Reads every file under one strategy. The checksum is the total byte count;
/// exactly one result is recorded per path regardless of failures.
pub fn run(strategy: ExecStrategy, paths: &[PathBuf], workers: usize) -> Result<BenchRun> {
    let workers = workers.max(1);
    debug!("io bench: {} files across {} workers ({})", paths.len(), workers, strategy);

    let started = Instant::now();
    let results = match strategy {
        ExecStrategy::Sequential => paths.iter().map(|p| read_file(p)).collect(),
        ExecStrategy::Threads => run_threads(paths, workers),
        ExecStrategy::Processes => run_processes(paths, workers)?,
    };
    let elapsed = started.elapsed();

    anyhow::ensure!(
        results.len() == paths.len(),
        "collected {} results for {} files",
        results.len(),
        paths.len()
    );

    let total_bytes = results.iter().fold(0u64, |acc, r| acc.wrapping_add(r.bytes));
    let failures = results.iter().filter(|r| !r.ok).count();

    Ok(BenchRun::new(
        format!("io/{}", strategy),
        workers,
        paths.len(),
        failures,
        elapsed,
        total_bytes,
    ))
}

/// Runs the read-back under every strategy against the same file set.
pub fn compare(paths: &[PathBuf], workers: usize) -> Result<BenchReport> {
    let mut runs = Vec::new();
    for strategy in ExecStrategy::all() {
        runs.push(run(*strategy, paths, workers)?);
    }
    Ok(BenchReport::new("io", runs))
}

/// Splits the paths into one contiguous chunk per worker thread; each thread
/// reads its chunk and reports per-file results over the channel.
fn run_threads(paths: &[PathBuf], workers: usize) -> Vec<ReadResult> {
    if paths.is_empty() {
        return Vec::new();
    }

    let chunk_size = paths.len().div_ceil(workers);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for chunk in paths.chunks(chunk_size) {
            let tx = tx.clone();
            scope.spawn(move || {
                for path in chunk {
                    let _ = tx.send(read_file(path));
                }
            });
        }
    });
    drop(tx);

    rx.into_iter().collect()
}

/// One child process per worker chunk; children print one `ok <bytes>` or
/// `err 0` line per file in argument order.
fn run_processes(paths: &[PathBuf], workers: usize) -> Result<Vec<ReadResult>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    let chunk_size = paths.len().div_ceil(workers);

    let mut children = Vec::new();
    for chunk in paths.chunks(chunk_size) {
        let child = Command::new(&exe)
            .arg("worker")
            .arg("io")
            .args(chunk)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn io worker process")?;
        children.push((child, chunk.len()));
    }

    let mut results = Vec::with_capacity(paths.len());
    for (child, expected) in children {
        let output = child.wait_with_output().context("Failed to wait for io worker")?;
        anyhow::ensure!(output.status.success(), "io worker exited with {}", output.status);

        let text = String::from_utf8(output.stdout).context("io worker wrote invalid UTF-8")?;
        let mut lines = 0usize;
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let status = fields.next().unwrap_or("err");
            let bytes: u64 = fields.next().and_then(|v| v.parse().ok()).unwrap_or(0);
            results.push(ReadResult { bytes, ok: status == "ok" });
            lines += 1;
        }
        anyhow::ensure!(lines == expected, "io worker reported {} of {} files", lines, expected);
    }

    Ok(results)
}
