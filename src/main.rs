//! loadlab - Concurrent workload benchmarking and catalog scraping toolkit
//!
//! Partitioned workload benchmarks under sequential, thread-pool, and
//! process-pool execution, a concurrent catalog scraper with price
//! statistics, and a CSV-to-JSON conversion service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use loadlab::bench::strategy::ExecStrategy;
use loadlab::commands::{bench, BenchCommand, ScrapeCommand, ScrapeTarget, ServeCommand};
use loadlab::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "loadlab",
    version,
    about = "Concurrent workload benchmarking and catalog scraping toolkit",
    long_about = "Benchmarks CPU-bound and I/O-bound workloads under sequential, thread-pool, \
                  and process-pool execution, scrapes catalog listings concurrently, and serves \
                  a CSV-to-JSON conversion endpoint."
)]
struct Cli {
    /// Worker pool size (defaults to available cores, capped at 8)
    #[arg(short, long, global = true, env = "LOADLAB_WORKERS")]
    workers: Option<usize>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "LOADLAB_PROXY")]
    proxy: Option<String>,

    /// Delay between scrape requests in milliseconds
    #[arg(long, global = true, env = "LOADLAB_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run workload benchmarks
    #[command(alias = "b")]
    Bench {
        #[command(subcommand)]
        suite: BenchSuite,
    },

    /// Scrape catalog listings and analyze prices
    #[command(alias = "sc")]
    Scrape {
        /// Catalog page URLs to fetch
        urls: Vec<String>,

        /// Search query instead of explicit URLs
        #[arg(short, long, conflicts_with = "urls")]
        query: Option<String>,

        /// Number of search result pages to fetch
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Maximum listings taken per page
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// Serve the CSV-to-JSON conversion endpoint
    Serve {
        /// Bind address, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List supported execution strategies
    Strategies,

    /// Internal worker entry points for the process pool
    #[command(hide = true)]
    Worker {
        #[command(subcommand)]
        task: WorkerTask,
    },
}

#[derive(Subcommand)]
enum BenchSuite {
    /// CPU-bound sum-of-squares workload
    Cpu {
        /// Total iteration count
        #[arg(short, long)]
        iterations: Option<u64>,

        /// Run only this strategy instead of comparing all
        #[arg(short, long)]
        strategy: Option<ExecStrategy>,
    },

    /// File I/O workload: generate dummy files and read them back
    Io {
        /// Number of dummy files
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Size of each file in KiB
        #[arg(long)]
        size_kb: Option<usize>,

        /// Directory for the generated files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Run only this strategy instead of comparing all
        #[arg(short, long)]
        strategy: Option<ExecStrategy>,

        /// Keep the generated files after the run
        #[arg(long)]
        keep: bool,
    },

    /// String building and eager-vs-lazy micro-benchmarks
    Micro {
        /// Number of string pieces to concatenate
        #[arg(long, default_value = "10000")]
        pieces: usize,

        /// Number of items summed by the eager/lazy variants
        #[arg(long, default_value = "1000000")]
        items: u64,
    },
}

#[derive(Subcommand)]
enum WorkerTask {
    /// Compute one CPU partition and print its checksum
    Cpu {
        #[arg(long)]
        start: u64,

        #[arg(long)]
        len: u64,
    },

    /// Read files and print one result line per path
    Io {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Stdout is reserved for results (the process pool
    // parses worker stdout), so logs go to stderr.
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Worker entry points skip config loading entirely
    if let Commands::Worker { task } = &cli.command {
        return match task {
            WorkerTask::Cpu { start, len } => bench::cpu_worker(*start, *len),
            WorkerTask::Io { paths } => bench::io_worker(paths),
        };
    }

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(workers) = cli.workers {
        config.workers = workers.max(1);
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }

    match cli.command {
        Commands::Bench { suite } => {
            let output = match suite {
                BenchSuite::Cpu { iterations, strategy } => {
                    if let Some(iterations) = iterations {
                        config.iterations = iterations;
                    }
                    let cmd = BenchCommand::new(config);
                    cmd.execute_cpu(strategy)?
                }
                BenchSuite::Io { count, size_kb, dir, strategy, keep } => {
                    if let Some(count) = count {
                        config.file_count = count;
                    }
                    if let Some(size_kb) = size_kb {
                        config.file_size_kb = size_kb;
                    }
                    if let Some(dir) = dir {
                        config.data_dir = dir;
                    }
                    let cmd = BenchCommand::new(config);
                    cmd.execute_io(strategy, keep)?
                }
                BenchSuite::Micro { pieces, items } => {
                    let cmd = BenchCommand::new(config);
                    cmd.execute_micro(pieces, items)?
                }
            };
            println!("{}", output);
        }

        Commands::Scrape { urls, query, pages, max } => {
            if let Some(max) = max {
                config.max_listings = max;
            }

            let target = match query {
                Some(query) => ScrapeTarget::Query { query, pages },
                None => {
                    if urls.is_empty() {
                        anyhow::bail!("Provide catalog URLs or a --query to scrape.");
                    }
                    ScrapeTarget::Urls(urls)
                }
            };

            let cmd = ScrapeCommand::new(config);
            let output = cmd.execute(target).await?;
            println!("{}", output);
        }

        Commands::Serve { bind } => {
            let cmd = ServeCommand::new(config);
            cmd.execute(bind).await?;
        }

        Commands::Strategies => {
            println!("Supported execution strategies:\n");
            println!("{:<12} {}", "Name", "Description");
            println!("{:-<12} {:-<45}", "", "");

            for strategy in ExecStrategy::all() {
                println!("{:<12} {}", strategy.to_string(), strategy.description());
            }
        }

        Commands::Worker { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}
