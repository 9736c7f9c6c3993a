//! # web2docx
//!
//! Crawl article pages listed in a spreadsheet into Word documents.
//!
//! Given an `.xlsx`/`.xls`/`.ods` file with a column of URLs, web2docx
//! fetches each page, locates its main content region, classifies the
//! headings, paragraphs, list items, and images it finds there, and writes
//! the result as `.docx` - either one document per URL or a single combined
//! compilation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), web2docx::Web2DocxError> {
//! use web2docx::{crawl, CrawlConfig, OutputMode};
//!
//! let config = CrawlConfig::builder()
//!     .output_mode(OutputMode::Combined)
//!     .min_text_len(30)
//!     .build()?;
//!
//! let output = crawl("urls.xlsx", "output", &config).await?;
//! println!(
//!     "{} of {} pages rendered into {}",
//!     output.stats.processed_pages,
//!     output.stats.total_urls,
//!     output.output_dir.display(),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! spreadsheet ──▶ fetch ──▶ select region ──▶ classify blocks ──▶ images ──▶ docx
//! ```
//!
//! URLs are processed strictly sequentially and there are no retries. A
//! failed page is recorded in the crawl report and the run continues; a
//! failed image becomes a placeholder line inside its document. Only
//! crawl-level problems (unreadable spreadsheet, missing URL column,
//! unwritable output directory) abort the run.
//!
//! ## Feature Flags
//!
//! - `cli` *(default)* - builds the `web2docx` binary (clap, indicatif,
//!   tracing-subscriber). Disable for library-only use:
//!   `web2docx = { version = "...", default-features = false }`.

pub mod config;
pub mod crawl;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

pub use config::{CrawlConfig, CrawlConfigBuilder, DedupMode, OutputMode};
pub use crawl::{crawl, crawl_sync};
pub use error::{PageError, Web2DocxError};
pub use output::{CrawlOutput, CrawlStats, PageResult};
pub use progress::{CrawlProgressCallback, NoopProgressCallback, ProgressCallback};

// Lower-level pipeline pieces, exposed for callers that want extraction
// without the HTTP/docx machinery (and for integration tests).
pub use pipeline::extract::{extract_blocks, Block, ExtractedPage};
pub use pipeline::input::load_urls;
pub use pipeline::image::{prepare_image, EmbeddedImage};
pub use pipeline::render::sanitize_filename;
