//! Output formatting for scrape reports and benchmark runs.

use crate::bench::report::BenchReport;
use crate::catalog::models::ScrapeReport;
use crate::config::OutputFormat;

/// Formats reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a scrape report.
    pub fn format_scrape(&self, report: &ScrapeReport) -> String {
        if report.is_empty() {
            return match self.format {
                OutputFormat::Json => serde_json::to_string_pretty(report)
                    .unwrap_or_else(|_| "{}".to_string()),
                OutputFormat::Csv => Self::scrape_csv_header().to_string(),
                _ => "No listings found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.scrape_table(report),
            OutputFormat::Markdown => self.scrape_markdown(report),
            OutputFormat::Csv => self.scrape_csv(report),
        }
    }

    /// Formats a benchmark report.
    pub fn format_bench(&self, report: &BenchReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.bench_table(report),
            OutputFormat::Markdown => self.bench_markdown(report),
            OutputFormat::Csv => self.bench_csv(report),
        }
    }

    // Scrape formatting

    fn scrape_table(&self, report: &ScrapeReport) -> String {
        let price_width = 14;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!("{:>price_width$}  {}", "Price", "Title"));
        lines.push(format!("{:->price_width$}  {:-<title_width$}", "", ""));

        for listing in &report.listings {
            let price_str = if listing.has_price() {
                format!("{:.2}", listing.price)
            } else {
                "N/A".to_string()
            };

            lines.push(format!("{:>price_width$}  {}", price_str, truncate(&listing.title, title_width)));
        }

        lines.push(String::new());
        lines.push(format!(
            "Total: {} listings from {} pages ({} fetch failures, {:.2}s)",
            report.count(),
            report.pages,
            report.failures,
            report.elapsed_secs
        ));

        let stats = &report.stats;
        if stats.count > 0 {
            lines.push(format!(
                "Prices ({} sampled): mean {:.2}, median {:.2}, std dev {:.2}, min {:.2}, max {:.2}",
                stats.count, stats.mean, stats.median, stats.std_dev, stats.min, stats.max
            ));
        } else {
            lines.push("Prices: no usable samples".to_string());
        }

        lines.join("\n")
    }

    fn scrape_markdown(&self, report: &ScrapeReport) -> String {
        let mut lines = Vec::new();

        lines.push("| Price | Title |".to_string());
        lines.push("|-------|-------|".to_string());

        for listing in &report.listings {
            let price_str = if listing.has_price() {
                format!("{:.2}", listing.price)
            } else {
                "N/A".to_string()
            };

            lines.push(format!(
                "| {} | [{}]({}) |",
                price_str,
                truncate(&listing.title, 40),
                listing.url
            ));
        }

        lines.push(String::new());
        let stats = &report.stats;
        lines.push(format!(
            "*{} listings; mean {:.2}, median {:.2}, std dev {:.2}*",
            report.count(),
            stats.mean,
            stats.median,
            stats.std_dev
        ));

        lines.join("\n")
    }

    fn scrape_csv_header() -> &'static str {
        "title,price,old_price,url"
    }

    fn scrape_csv(&self, report: &ScrapeReport) -> String {
        let mut lines = Vec::new();
        lines.push(Self::scrape_csv_header().to_string());

        for listing in &report.listings {
            let old_price = listing.old_price.map(|p| p.to_string()).unwrap_or_default();
            lines.push(format!(
                "{},{},{},{}",
                csv_escape(&listing.title),
                listing.price,
                old_price,
                listing.url
            ));
        }

        lines.join("\n")
    }

    // Bench formatting

    fn bench_table(&self, report: &BenchReport) -> String {
        let label_width = 16;
        let num_width = 8;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<label_width$}  {:>num_width$}  {:>num_width$}  {:>num_width$}  {:>12}  {:>8}",
            "Run", "Workers", "Tasks", "Failures", "Elapsed", "Speedup"
        ));
        lines.push(format!(
            "{:-<label_width$}  {:->num_width$}  {:->num_width$}  {:->num_width$}  {:->12}  {:->8}",
            "", "", "", "", "", ""
        ));

        for run in &report.runs {
            let speedup = report
                .speedup(run)
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "N/A".to_string());

            lines.push(format!(
                "{:<label_width$}  {:>num_width$}  {:>num_width$}  {:>num_width$}  {:>11.4}s  {:>8}",
                run.label, run.workers, run.tasks, run.failures, run.elapsed_secs, speedup
            ));
        }

        if !report.checksums_agree() {
            lines.push(String::new());
            lines.push("WARNING: checksums disagree across runs".to_string());
        }

        lines.join("\n")
    }

    fn bench_markdown(&self, report: &BenchReport) -> String {
        let mut lines = Vec::new();

        lines.push("| Run | Workers | Tasks | Failures | Elapsed | Speedup |".to_string());
        lines.push("|-----|---------|-------|----------|---------|---------|".to_string());

        for run in &report.runs {
            let speedup = report
                .speedup(run)
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "N/A".to_string());

            lines.push(format!(
                "| {} | {} | {} | {} | {:.4}s | {} |",
                run.label, run.workers, run.tasks, run.failures, run.elapsed_secs, speedup
            ));
        }

        lines.join("\n")
    }

    fn bench_csv(&self, report: &BenchReport) -> String {
        let mut lines = Vec::new();
        lines.push("label,workers,tasks,failures,elapsed_secs,checksum".to_string());

        for run in &report.runs {
            lines.push(format!(
                "{},{},{},{},{},{}",
                csv_escape(&run.label),
                run.workers,
                run.tasks,
                run.failures,
                run.elapsed_secs,
                run.checksum
            ));
        }

        lines.join("\n")
    }
}

/// Truncates text with an ellipsis at a character boundary.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Quotes a CSV field when it contains separators or quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
