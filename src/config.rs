//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Worker pool size for benchmarks and scraping
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Total iteration count for the CPU benchmark
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Number of dummy files for the I/O benchmark
    #[serde(default = "default_file_count")]
    pub file_count: usize,

    /// Size of each dummy file in KiB
    #[serde(default = "default_file_size_kb")]
    pub file_size_kb: usize,

    /// Directory for generated dummy files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the catalog site to scrape
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Outbound request timeout in seconds (no retries)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum listings taken from a single catalog page
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,

    /// Bind address for the CSV conversion service
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_workers() -> usize {
    num_cpus::get().clamp(1, 8)
}

fn default_iterations() -> u64 {
    80_000_000
}

fn default_file_count() -> usize {
    16
}

fn default_file_size_kb() -> usize {
    64
}

fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("loadlab")
}

fn default_base_url() -> String {
    "https://www.jumia.com.ng".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_delay_jitter_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_listings() -> usize {
    40
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            format: OutputFormat::Table,
            iterations: default_iterations(),
            file_count: default_file_count(),
            file_size_kb: default_file_size_kb(),
            data_dir: default_data_dir(),
            base_url: default_base_url(),
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_secs: default_timeout_secs(),
            max_listings: default_max_listings(),
            bind: default_bind(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("loadlab").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(workers) = std::env::var("LOADLAB_WORKERS") {
            if let Ok(w) = workers.parse::<usize>() {
                if w > 0 {
                    self.workers = w;
                }
            }
        }

        if let Ok(base_url) = std::env::var("LOADLAB_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("LOADLAB_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("LOADLAB_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
