//! The crawl driver: spreadsheet in, `.docx` files out.
//!
//! Orchestrates the pipeline stages strictly sequentially - one URL at a
//! time, one image at a time - matching how the output reads: documents in
//! input order, blocks in document order. There is no retry anywhere; a
//! failure is recorded and the crawl moves on.
//!
//! Failure isolation has three levels:
//! - a failed **image** becomes a placeholder block inside its page,
//! - a failed **page** becomes a [`PageResult`] carrying a [`PageError`],
//! - only **crawl-level** problems (bad spreadsheet, unwritable output
//!   directory) abort the run with a [`Web2DocxError`].

use crate::config::{CrawlConfig, OutputMode};
use crate::error::{PageError, Web2DocxError};
use crate::output::{CrawlOutput, CrawlStats, PageResult};
use crate::pipeline::extract::{extract_blocks, Block};
use crate::pipeline::fetch::{build_client, fetch_bytes, fetch_page};
use crate::pipeline::image::prepare_image;
use crate::pipeline::input::load_urls;
use crate::pipeline::render::{
    build_page_document, sanitize_filename, save_docx, CombinedDocument, RenderedBlock,
};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

/// Run a full crawl: read URLs from `spreadsheet`, process each one, and
/// write documents into `output_dir` (created if missing).
///
/// Returns the full per-page report. Fatal only when the crawl cannot
/// produce anything: unreadable spreadsheet, missing URL column, unwritable
/// output directory - or, in per-URL mode, when every single page failed.
/// In combined mode the compilation document is always written, with failed
/// pages included as "Failed to retrieve content" sections.
///
/// # Example
/// ```rust,no_run
/// # async fn run() -> Result<(), web2docx::Web2DocxError> {
/// let config = web2docx::CrawlConfig::default();
/// let output = web2docx::crawl("urls.xlsx", "output", &config).await?;
/// println!("{} pages, {} failed", output.stats.processed_pages, output.stats.failed_pages);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    spreadsheet: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &CrawlConfig,
) -> Result<CrawlOutput, Web2DocxError> {
    let spreadsheet = spreadsheet.as_ref();
    let output_dir = output_dir.as_ref();
    let crawl_start = Instant::now();

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Web2DocxError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let urls = load_urls(spreadsheet, config.sheet_name.as_deref(), &config.url_column)?;
    let total = urls.len();

    let client = build_client(config)?;
    let progress: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));
    progress.on_crawl_start(total);

    let mut pages: Vec<PageResult> = Vec::with_capacity(total);
    let mut combined = match config.output_mode {
        OutputMode::Combined => Some(CombinedDocument::new()),
        OutputMode::PerUrl => None,
    };
    let mut used_stems: HashSet<String> = HashSet::new();

    for (i, url_str) in urls.iter().enumerate() {
        let index = i + 1;
        progress.on_page_start(index, total, url_str);
        info!("Processing URL {}/{}: {}", index, total, url_str);
        let page_start = Instant::now();

        match process_url(&client, url_str, config).await {
            Ok(page) => {
                let file = match combined.as_mut() {
                    Some(doc) => {
                        doc.add_page(url_str, &page.blocks);
                        // shared path, filled in after the loop
                        None
                    }
                    None => {
                        let stem = page
                            .title
                            .as_deref()
                            .map(|t| sanitize_filename(t, config.filename_max_len))
                            .unwrap_or_else(|| format!("Page_{index}"));
                        let stem = unique_stem(stem, index, &mut used_stems);
                        let path = output_dir.join(format!("{stem}.docx"));
                        save_docx(
                            build_page_document(
                                page.title.as_deref().unwrap_or("Untitled Page"),
                                url_str,
                                &page.blocks,
                            ),
                            &path,
                        )
                        .await?;
                        Some(path)
                    }
                };

                progress.on_page_complete(index, total, page.text_blocks);
                pages.push(PageResult {
                    index,
                    url: url_str.clone(),
                    title: page.title,
                    text_blocks: page.text_blocks,
                    images_embedded: page.images_embedded,
                    image_failures: page.image_failures,
                    file,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                    error: None,
                });
            }
            Err(error) => {
                warn!("URL {}/{} failed: {}", index, total, error);
                if let Some(doc) = combined.as_mut() {
                    doc.add_failure(url_str, &error.to_string());
                }
                progress.on_page_error(index, total, &error.to_string());
                pages.push(PageResult {
                    index,
                    url: url_str.clone(),
                    title: None,
                    text_blocks: 0,
                    images_embedded: 0,
                    image_failures: 0,
                    file: None,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                    error: Some(error),
                });
            }
        }
    }

    if let Some(doc) = combined {
        let path = output_dir.join(&config.combined_filename);
        save_docx(doc.finish(), &path).await?;
        for page in pages.iter_mut().filter(|p| p.is_success()) {
            page.file = Some(path.clone());
        }
    }

    let processed = pages.iter().filter(|p| p.is_success()).count();
    let failed = total - processed;

    if processed == 0 && config.output_mode == OutputMode::PerUrl {
        // Nothing was written at all; surface the first failure.
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no pages".to_string());
        return Err(Web2DocxError::AllPagesFailed { total, first_error });
    }

    progress.on_crawl_complete(total, processed);

    let stats = CrawlStats {
        total_urls: total,
        processed_pages: processed,
        failed_pages: failed,
        images_embedded: pages.iter().map(|p| p.images_embedded).sum(),
        image_failures: pages.iter().map(|p| p.image_failures).sum(),
        total_duration_ms: crawl_start.elapsed().as_millis() as u64,
    };
    info!(
        "Crawl complete: {}/{} pages, {} images embedded, {} image failures",
        processed, total, stats.images_embedded, stats.image_failures
    );

    Ok(CrawlOutput {
        pages,
        stats,
        output_dir: output_dir.to_path_buf(),
    })
}

/// Blocking wrapper around [`crawl`] for callers without a runtime.
pub fn crawl_sync(
    spreadsheet: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &CrawlConfig,
) -> Result<CrawlOutput, Web2DocxError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Web2DocxError::Internal(format!("failed to start runtime: {e}")))?;
    runtime.block_on(crawl(spreadsheet, output_dir, config))
}

/// One fully rendered page, ready to be written or appended.
#[derive(Debug)]
struct RenderedPage {
    title: Option<String>,
    blocks: Vec<RenderedBlock>,
    text_blocks: usize,
    images_embedded: usize,
    image_failures: usize,
}

/// Fetch, classify, and render one URL. Images are fetched here, one at a
/// time; each image failure turns into a placeholder block and the page
/// carries on.
async fn process_url(
    client: &reqwest::Client,
    url_str: &str,
    config: &CrawlConfig,
) -> Result<RenderedPage, PageError> {
    let url = Url::parse(url_str).map_err(|e| PageError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    let body = fetch_page(client, &url).await?;
    // Parsing stays inside extract_blocks: the parsed document is not Send,
    // so only owned blocks cross the awaits below.
    let extracted = extract_blocks(&body, &url, config);
    info!(
        "Extracted {} blocks from {} (region: {})",
        extracted.blocks.len(),
        url,
        extracted.strategy
    );

    let mut blocks = Vec::with_capacity(extracted.blocks.len());
    let mut text_blocks = 0usize;
    let mut images_embedded = 0usize;
    let mut image_failures = 0usize;

    for block in extracted.blocks {
        match block {
            Block::Heading { level, text } => {
                text_blocks += 1;
                blocks.push(RenderedBlock::Heading { level, text });
            }
            Block::Paragraph(text) => {
                text_blocks += 1;
                blocks.push(RenderedBlock::Paragraph(text));
            }
            Block::ListItem(text) => {
                text_blocks += 1;
                blocks.push(RenderedBlock::ListItem(text));
            }
            Block::Image { url: img_url, .. } => {
                match embed_image(client, &img_url, config.image_max_dim).await {
                    Ok(img) => {
                        images_embedded += 1;
                        blocks.push(RenderedBlock::Image(img));
                    }
                    Err(reason) => {
                        warn!("Image {} skipped: {}", img_url, reason);
                        image_failures += 1;
                        blocks.push(RenderedBlock::ImagePlaceholder(format!(
                            "{img_url}: {reason}"
                        )));
                    }
                }
            }
        }
    }

    Ok(RenderedPage {
        title: extracted.title,
        blocks,
        text_blocks,
        images_embedded,
        image_failures,
    })
}

/// Fetch and normalise one image; the error is just placeholder text.
async fn embed_image(
    client: &reqwest::Client,
    url: &Url,
    max_dim: u32,
) -> Result<crate::pipeline::image::EmbeddedImage, String> {
    let bytes = fetch_bytes(client, url).await?;
    prepare_image(&bytes, max_dim).map_err(|e| e.to_string())
}

/// Keep per-URL filenames distinct when two pages share a title. The page
/// index makes the fallback unique by construction.
fn unique_stem(stem: String, index: usize, used: &mut HashSet<String>) -> String {
    let chosen = if used.contains(&stem) {
        format!("{stem}_{index}")
    } else {
        stem
    };
    used.insert(chosen.clone());
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    #[tokio::test]
    async fn missing_spreadsheet_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = crawl(
            dir.path().join("absent.xlsx"),
            dir.path().join("out"),
            &CrawlConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Web2DocxError::SpreadsheetNotFound { .. }));
    }

    #[tokio::test]
    async fn unreadable_workbook_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A real file, but not a workbook.
        let err = crawl("Cargo.toml", dir.path().join("out"), &CrawlConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Web2DocxError::SpreadsheetRead { .. }));
    }

    #[tokio::test]
    async fn invalid_url_is_a_page_error() {
        let client = build_client(&CrawlConfig::default()).unwrap();
        let err = process_url(&client, "not a url", &CrawlConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn unresolvable_host_is_a_page_error() {
        let config = CrawlConfig::builder()
            .connect_timeout_secs(1)
            .request_timeout_secs(1)
            .build()
            .unwrap();
        let client = build_client(&config).unwrap();
        let err = process_url(&client, "http://host.invalid/page", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::Fetch { .. }));
    }

    #[test]
    fn duplicate_titles_get_distinct_stems() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("About".into(), 1, &mut used), "About");
        assert_eq!(unique_stem("About".into(), 2, &mut used), "About_2");
        assert_eq!(unique_stem("Contact".into(), 3, &mut used), "Contact");
    }

    #[test]
    fn crawl_sync_reports_the_same_fatal_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = crawl_sync(
            dir.path().join("absent.xlsx"),
            dir.path().join("out"),
            &CrawlConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Web2DocxError::SpreadsheetNotFound { .. }));
    }
}
