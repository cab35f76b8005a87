//! Micro-benchmarks: string building variants and eager vs. lazy generation.

use crate::bench::report::{BenchReport, BenchRun};
use std::time::Instant;

/// Builds a string by repeated re-allocating concatenation. Quadratic on
/// purpose: this is the anti-pattern the other variants are measured against.
pub fn build_concat(pieces: &[&str]) -> String {
    let mut result = String::new();
    for piece in pieces {
        result = format!("{}{}", result, piece);
    }
    result
}

/// Builds the same string with a single pre-sized buffer.
pub fn build_push(pieces: &[&str]) -> String {
    let total: usize = pieces.iter().map(|p| p.len()).sum();
    let mut result = String::with_capacity(total);
    for piece in pieces {
        result.push_str(piece);
    }
    result
}

/// Builds the same string with `concat` over the slice.
pub fn build_join(pieces: &[&str]) -> String {
    pieces.concat()
}

/// Sums squares after materializing the whole vector first.
pub fn sum_eager(items: u64) -> u64 {
    let squares: Vec<u64> = (1..=items).map(|i| i.wrapping_mul(i)).collect();
    squares.iter().fold(0u64, |acc, v| acc.wrapping_add(*v))
}

/// Sums squares straight off the iterator, no intermediate allocation.
pub fn sum_lazy(items: u64) -> u64 {
    (1..=items).map(|i| i.wrapping_mul(i)).fold(0u64, |acc, v| acc.wrapping_add(v))
}

/// Runs every micro-benchmark variant. String runs use the output length as the
/// checksum; the summation runs use the sum itself, so agreement within each
/// pair is checkable from the report.
pub fn run(pieces: usize, items: u64) -> BenchReport {
    let parts: Vec<&str> = vec!["test"; pieces];

    let mut runs = Vec::new();

    let started = Instant::now();
    let concat = build_concat(&parts);
    runs.push(BenchRun::new("string/concat", 1, pieces, 0, started.elapsed(), concat.len() as u64));

    let started = Instant::now();
    let push = build_push(&parts);
    runs.push(BenchRun::new("string/push", 1, pieces, 0, started.elapsed(), push.len() as u64));

    let started = Instant::now();
    let join = build_join(&parts);
    runs.push(BenchRun::new("string/join", 1, pieces, 0, started.elapsed(), join.len() as u64));

    let started = Instant::now();
    let eager = sum_eager(items);
    runs.push(BenchRun::new("sum/eager", 1, items as usize, 0, started.elapsed(), eager));

    let started = Instant::now();
    let lazy = sum_lazy(items);
    runs.push(BenchRun::new("sum/lazy", 1, items as usize, 0, started.elapsed(), lazy));

    BenchReport::new("micro", runs)
}
