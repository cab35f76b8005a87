//! End-to-end benchmark properties: file round-trips and strategy agreement.

use loadlab::bench::strategy::ExecStrategy;
use loadlab::bench::{cpu, io};
use tempfile::TempDir;

#[test]
fn test_file_roundtrip_sums_to_exact_total() {
    let dir = TempDir::new().unwrap();

    // K files of S KiB read back yield K results summing to K * S * 1024 bytes
    let count = 6;
    let size_kb = 4;
    let paths = io::generate(dir.path(), count, size_kb).unwrap();
    assert_eq!(paths.len(), count);

    for strategy in [ExecStrategy::Sequential, ExecStrategy::Threads] {
        let run = io::run(strategy, &paths, 3).unwrap();
        assert_eq!(run.tasks, count, "strategy = {}", strategy);
        assert_eq!(run.failures, 0, "strategy = {}", strategy);
        assert_eq!(run.checksum, (count * size_kb * 1024) as u64, "strategy = {}", strategy);
    }
}

#[test]
fn test_missing_file_counts_as_failure_not_error() {
    let dir = TempDir::new().unwrap();
    let mut paths = io::generate(dir.path(), 2, 1).unwrap();
    paths.push(dir.path().join("not-there.dat"));

    let run = io::run(ExecStrategy::Threads, &paths, 2).unwrap();
    assert_eq!(run.tasks, 3);
    assert_eq!(run.failures, 1);
    assert_eq!(run.checksum, 2 * 1024);
}

#[test]
fn test_cpu_strategies_agree_on_checksum() {
    let iterations = 200_000;

    let sequential = cpu::run(ExecStrategy::Sequential, iterations, 4).unwrap();
    let threads = cpu::run(ExecStrategy::Threads, iterations, 4).unwrap();

    assert_eq!(sequential.checksum, threads.checksum);

    // Partition layout does not change the checksum
    let threads_wide = cpu::run(ExecStrategy::Threads, iterations, 7).unwrap();
    assert_eq!(sequential.checksum, threads_wide.checksum);
}

#[test]
fn test_cpu_partition_invariant_holds_for_odd_splits() {
    for workers in 1..=9 {
        let parts = cpu::partition(1_000_001, workers);
        assert_eq!(parts.len(), workers);
        assert_eq!(parts.iter().map(|&(_, len)| len).sum::<u64>(), 1_000_001);
    }
}
