//! Result types returned by a crawl.
//!
//! A crawl produces one [`PageResult`] per input URL - success or failure -
//! plus aggregate [`CrawlStats`]. Everything is `serde`-serialisable so the
//! CLI can emit the whole report as JSON.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The outcome of processing one URL from the input list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based position in the URL list.
    pub index: usize,

    /// The URL as it appeared in the spreadsheet.
    pub url: String,

    /// Page title (first `<h1>` of the content region, else `<title>`).
    pub title: Option<String>,

    /// Text blocks (headings, paragraphs, list items) rendered into the document.
    pub text_blocks: usize,

    /// Images successfully fetched, normalised, and embedded.
    pub images_embedded: usize,

    /// Images replaced by a textual placeholder after fetch/decode failure.
    pub image_failures: usize,

    /// Where the content was written. In combined mode every contributing
    /// page points at the shared document.
    pub file: Option<PathBuf>,

    /// Wall-clock time spent on this URL, fetch through save.
    pub duration_ms: u64,

    /// Set when the page failed at the URL boundary; all counts above are 0.
    pub error: Option<PageError>,
}

impl PageResult {
    /// True when the page was fetched and rendered without a page-level error.
    /// Individual image failures do not make a page failed.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a crawl run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlStats {
    /// URLs read from the spreadsheet after dropping empty cells.
    pub total_urls: usize,
    /// Pages rendered into a document.
    pub processed_pages: usize,
    /// Pages that failed at the URL boundary.
    pub failed_pages: usize,
    /// Images embedded across all pages.
    pub images_embedded: usize,
    /// Images replaced by placeholders across all pages.
    pub image_failures: usize,
    /// Total wall-clock duration of the crawl.
    pub total_duration_ms: u64,
}

/// Full crawl report: per-page results plus aggregate stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutput {
    /// One entry per input URL, in input order.
    pub pages: Vec<PageResult>,
    /// Aggregate counters.
    pub stats: CrawlStats,
    /// Directory the documents were written to.
    pub output_dir: PathBuf,
}

impl CrawlOutput {
    /// Paths of every document produced, deduplicated, in first-written order.
    pub fn documents(&self) -> Vec<&PathBuf> {
        let mut seen: Vec<&PathBuf> = Vec::new();
        for page in &self.pages {
            if let Some(ref path) = page.file {
                if !seen.contains(&path) {
                    seen.push(path);
                }
            }
        }
        seen
    }
}
