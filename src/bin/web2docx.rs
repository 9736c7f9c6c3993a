//! web2docx command-line interface.
//!
//! Thin wrapper over [`web2docx::crawl`]: parse arguments, build a
//! [`CrawlConfig`], wire a progress bar into the crawl's callback, and print
//! either a human summary or the full JSON report.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use web2docx::{CrawlConfig, CrawlProgressCallback, DedupMode, OutputMode};

const AFTER_HELP: &str = "\
EXAMPLES:
    # One document per URL, read from the 'URL' column of the first sheet
    web2docx urls.xlsx

    # A single combined compilation document
    web2docx urls.xlsx --combined -o reports

    # Custom sheet and column, drop fragments under 30 characters
    web2docx sites.ods --sheet Links --column Address --min-text-len 30

    # Suppress duplicate fragments and cap images, emit the JSON report
    web2docx urls.xlsx --dedup hash --max-images 5 --json
";

#[derive(Parser, Debug)]
#[command(
    name = "web2docx",
    version,
    about = "Crawl article pages from a spreadsheet of URLs into Word documents",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Spreadsheet holding the URL list (.xlsx, .xls, or .ods)
    spreadsheet: PathBuf,

    /// Directory to write documents into (created if missing)
    #[arg(short, long, default_value = "output", env = "WEB2DOCX_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Worksheet to read (default: the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Header of the column holding the URLs
    #[arg(long, default_value = "URL", env = "WEB2DOCX_COLUMN")]
    column: String,

    /// Write one combined document instead of one per URL
    #[arg(long)]
    combined: bool,

    /// Filename of the combined document
    #[arg(long, default_value = "web_content_compilation.docx")]
    combined_name: String,

    /// Duplicate-fragment suppression
    #[arg(long, value_enum, default_value_t = DedupArg::Off)]
    dedup: DedupArg,

    /// Drop text fragments shorter than this many characters
    #[arg(long, default_value_t = 0)]
    min_text_len: usize,

    /// Cap on embedded images per page (default: unlimited)
    #[arg(long)]
    max_images: Option<usize>,

    /// Maximum image dimension in pixels after downscaling
    #[arg(long, default_value_t = 600)]
    max_dim: u32,

    /// Per-request timeout in seconds (pages and images)
    #[arg(long, default_value_t = 30, env = "WEB2DOCX_TIMEOUT")]
    timeout: u64,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Override the User-Agent header
    #[arg(long, env = "WEB2DOCX_USER_AGENT")]
    user_agent: Option<String>,

    /// Maximum length of generated filename stems, in characters
    #[arg(long, default_value_t = 100)]
    filename_max_len: usize,

    /// Print the full crawl report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DedupArg {
    /// Keep every fragment
    Off,
    /// Seen-set of exact fragment text
    Text,
    /// Seen-set of content hashes
    Hash,
}

impl From<DedupArg> for DedupMode {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Off => DedupMode::Off,
            DedupArg::Text => DedupMode::ExactText,
            DedupArg::Hash => DedupMode::ContentHash,
        }
    }
}

/// Progress bar wired into the crawl callback. The bar length arrives with
/// the first event; per-URL outcomes are printed above the bar so they
/// survive redraws.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        Self { bar }
    }
}

impl CrawlProgressCallback for CliProgress {
    fn on_crawl_start(&self, total_urls: usize) {
        self.bar.set_length(total_urls as u64);
    }

    fn on_page_start(&self, _index: usize, _total: usize, url: &str) {
        self.bar.set_message(url.to_string());
    }

    fn on_page_complete(&self, index: usize, total: usize, text_blocks: usize) {
        self.bar
            .println(format!("[{index}/{total}] ok ({text_blocks} text blocks)"));
        self.bar.inc(1);
    }

    fn on_page_error(&self, index: usize, total: usize, error: &str) {
        self.bar.println(format!("[{index}/{total}] FAILED: {error}"));
        self.bar.inc(1);
    }

    fn on_crawl_complete(&self, _total: usize, _success: usize) {
        self.bar.finish_and_clear();
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("web2docx={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut builder = CrawlConfig::builder()
        .url_column(&cli.column)
        .output_mode(if cli.combined {
            OutputMode::Combined
        } else {
            OutputMode::PerUrl
        })
        .dedup(cli.dedup.into())
        .min_text_len(cli.min_text_len)
        .image_max_dim(cli.max_dim)
        .connect_timeout_secs(cli.connect_timeout)
        .request_timeout_secs(cli.timeout)
        .filename_max_len(cli.filename_max_len)
        .combined_filename(&cli.combined_name);

    if let Some(sheet) = &cli.sheet {
        builder = builder.sheet_name(sheet);
    }
    if let Some(cap) = cli.max_images {
        builder = builder.max_images_per_page(cap);
    }
    if let Some(ua) = &cli.user_agent {
        builder = builder.user_agent(ua);
    }
    if !cli.no_progress && !cli.json {
        builder = builder.progress_callback(Arc::new(CliProgress::new()));
    }

    let config = builder.build().context("invalid configuration")?;

    let output = web2docx::crawl(&cli.spreadsheet, &cli.output_dir, &config)
        .await
        .context("crawl failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let stats = &output.stats;
    println!();
    println!(
        "Done: {}/{} pages rendered ({} failed) in {:.1}s",
        stats.processed_pages,
        stats.total_urls,
        stats.failed_pages,
        stats.total_duration_ms as f64 / 1000.0
    );
    println!(
        "Images: {} embedded, {} replaced by placeholders",
        stats.images_embedded, stats.image_failures
    );
    for doc in output.documents() {
        println!("  {}", doc.display());
    }
    for page in output.pages.iter().filter(|p| !p.is_success()) {
        if let Some(err) = &page.error {
            eprintln!("  [{}] {}", page.index, err);
        }
    }

    Ok(())
}
