//! Element classification: turn the selected region into an ordered block list.
//!
//! Walks the region's descendants in document order, keeping only the tags
//! the renderer knows: `h1`–`h5`, `p`, `li`, `img`. Everything else -
//! scripts, navs, tables, spans - contributes at most its text through an
//! enclosing kept element.
//!
//! Three filters run per text element, all configurable:
//! - whitespace-collapsed text must be non-empty,
//! - at least `min_text_len` characters,
//! - not seen before, when a [`DedupMode`] is enabled.
//!
//! Elements inside advert-like containers are dropped wholesale. The match
//! is on class/id *tokens*, not substrings - `header` must not trip an `ad`
//! filter.

use crate::config::{CrawlConfig, DedupMode};
use crate::pipeline::select::{collapsed_text, page_title, select_content_region};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

static BLOCK_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, p, li, img").unwrap());

/// Advert-container pattern, anchored to token boundaries within class/id
/// strings so that e.g. `header` or `gradient` never matches.
static AD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[-_\s])(?:ads?|advert(?:isement)?s?|promo|sponsored?)(?:$|[-_\s])")
        .unwrap()
});

/// One classified content node, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `h1`–`h5`, level preserved.
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    /// `src`/`data-src` resolved to an absolute http(s) URL.
    Image { url: Url, alt: Option<String> },
}

impl Block {
    /// Text carried by the block, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph(text) | Block::ListItem(text) => {
                Some(text)
            }
            Block::Image { .. } => None,
        }
    }
}

/// The classified content of one page.
#[derive(Debug)]
pub struct ExtractedPage {
    /// First `<h1>` of the region, else the `<title>` tag.
    pub title: Option<String>,
    /// Name of the selector strategy that chose the region (diagnostics).
    pub strategy: &'static str,
    /// Blocks in document order.
    pub blocks: Vec<Block>,
}

/// Parse `html`, select the content region, and classify its elements.
///
/// Pure with respect to I/O: image blocks carry URLs, not bytes. Fetching
/// and normalising them is the driver's job, so this function stays
/// testable without a network.
pub fn extract_blocks(html: &str, page_url: &Url, config: &CrawlConfig) -> ExtractedPage {
    let doc = Html::parse_document(html);
    let region = select_content_region(&doc);
    let title = page_title(&doc, region.element);

    let mut seen = SeenSet::new(config.dedup);
    let mut blocks = Vec::new();
    let mut image_count = 0usize;

    for el in region.element.select(&BLOCK_SEL) {
        if inside_ad_container(el, region.element) {
            continue;
        }

        match el.value().name() {
            "img" => {
                if let Some(cap) = config.max_images_per_page {
                    if image_count >= cap {
                        continue;
                    }
                }
                if let Some(url) = resolve_img_src(el, page_url) {
                    let alt = el
                        .value()
                        .attr("alt")
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty());
                    blocks.push(Block::Image { url, alt });
                    image_count += 1;
                }
            }
            name => {
                // A <p> wrapped by an <li> would render twice; the list item
                // already carries its text.
                if name == "p" && has_li_ancestor(el, region.element) {
                    continue;
                }

                let text = collapsed_text(el);
                if text.is_empty() || text.chars().count() < config.min_text_len {
                    continue;
                }
                if !seen.insert(&text) {
                    debug!("Dropped duplicate fragment: {:.40}…", text);
                    continue;
                }

                blocks.push(match name {
                    "p" => Block::Paragraph(text),
                    "li" => Block::ListItem(text),
                    heading => Block::Heading {
                        level: heading[1..].parse().unwrap_or(1),
                        text,
                    },
                });
            }
        }
    }

    ExtractedPage {
        title,
        strategy: region.strategy,
        blocks,
    }
}

// ── Deduplication ────────────────────────────────────────────────────────

/// Seen-set behind [`DedupMode`]. `insert` returns true for fresh text.
enum SeenSet {
    Off,
    Text(HashSet<String>),
    Hash(HashSet<[u8; 32]>),
}

impl SeenSet {
    fn new(mode: DedupMode) -> Self {
        match mode {
            DedupMode::Off => SeenSet::Off,
            DedupMode::ExactText => SeenSet::Text(HashSet::new()),
            DedupMode::ContentHash => SeenSet::Hash(HashSet::new()),
        }
    }

    fn insert(&mut self, text: &str) -> bool {
        match self {
            SeenSet::Off => true,
            SeenSet::Text(set) => set.insert(text.to_string()),
            SeenSet::Hash(set) => set.insert(*blake3::hash(text.as_bytes()).as_bytes()),
        }
    }
}

// ── Element helpers ──────────────────────────────────────────────────────

/// True if `el` or any ancestor up to (and excluding) the region boundary
/// carries an advert-like class or id.
fn inside_ad_container(el: ElementRef<'_>, region: ElementRef<'_>) -> bool {
    let mut node = Some(*el);
    while let Some(current) = node {
        if current.id() == region.id() {
            break;
        }
        if let Some(element) = ElementRef::wrap(current) {
            if is_ad_element(element) {
                return true;
            }
        }
        node = current.parent();
    }
    false
}

fn is_ad_element(el: ElementRef<'_>) -> bool {
    let id = el.value().id().unwrap_or("");
    let classes = el.value().classes().collect::<Vec<_>>().join(" ");
    AD_RE.is_match(&format!("{id} {classes}"))
}

fn has_li_ancestor(el: ElementRef<'_>, region: ElementRef<'_>) -> bool {
    let mut node = el.parent();
    while let Some(current) = node {
        if current.id() == region.id() {
            break;
        }
        if let Some(element) = ElementRef::wrap(current) {
            if element.value().name() == "li" {
                return true;
            }
        }
        node = current.parent();
    }
    false
}

/// Resolve `src` (else the lazy-load `data-src`) against the page URL.
/// Only http(s) results are kept - `data:` and `javascript:` sources are
/// not fetchable images.
fn resolve_img_src(el: ElementRef<'_>, page_url: &Url) -> Option<Url> {
    let raw = el
        .value()
        .attr("src")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| el.value().attr("data-src").filter(|s| !s.trim().is_empty()))?;

    let resolved = page_url.join(raw.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    fn base() -> Url {
        Url::parse("https://example.com/articles/page").unwrap()
    }

    fn extract(html: &str, config: &CrawlConfig) -> ExtractedPage {
        extract_blocks(html, &base(), config)
    }

    #[test]
    fn classifies_in_document_order() {
        let html = r#"<html><body><main>
            <h1>Title</h1>
            <p>Hello world</p>
            <ul><li>First item</li></ul>
            <img src="/x.png" alt="pic">
        </main></body></html>"#;
        let page = extract(html, &CrawlConfig::default());

        assert_eq!(page.title.as_deref(), Some("Title"));
        assert_eq!(page.blocks.len(), 4);
        assert_eq!(
            page.blocks[0],
            Block::Heading {
                level: 1,
                text: "Title".into()
            }
        );
        assert_eq!(page.blocks[1], Block::Paragraph("Hello world".into()));
        assert_eq!(page.blocks[2], Block::ListItem("First item".into()));
        assert_eq!(
            page.blocks[3],
            Block::Image {
                url: Url::parse("https://example.com/x.png").unwrap(),
                alt: Some("pic".into())
            }
        );
    }

    #[test]
    fn heading_levels_preserved() {
        let html = "<main><h3>Sub</h3><h5>Deep</h5></main>";
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(
            page.blocks,
            vec![
                Block::Heading { level: 3, text: "Sub".into() },
                Block::Heading { level: 5, text: "Deep".into() },
            ]
        );
    }

    #[test]
    fn empty_and_whitespace_text_skipped() {
        let html = "<main><p>   </p><p></p><p>kept</p></main>";
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(page.blocks, vec![Block::Paragraph("kept".into())]);
    }

    #[test]
    fn min_text_len_drops_short_fragments() {
        let config = CrawlConfig::builder().min_text_len(30).build().unwrap();
        let html = "<main><p>Home</p><p>This sentence is comfortably longer than thirty characters.</p></main>";
        let page = extract(html, &config);
        assert_eq!(page.blocks.len(), 1);
        assert!(page.blocks[0].text().unwrap().starts_with("This sentence"));
    }

    #[test]
    fn exact_text_dedup_keeps_one_copy() {
        let config = CrawlConfig::builder()
            .dedup(DedupMode::ExactText)
            .build()
            .unwrap();
        let html = "<main><p>Repeated line</p><p>Repeated line</p><p>Unique</p></main>";
        let page = extract(html, &config);
        let repeated = page
            .blocks
            .iter()
            .filter(|b| b.text() == Some("Repeated line"))
            .count();
        assert_eq!(repeated, 1);
        assert_eq!(page.blocks.len(), 2);
    }

    #[test]
    fn content_hash_dedup_matches_exact_text() {
        let html = "<main><p>Repeated line</p><p>Repeated line</p></main>";
        for mode in [DedupMode::ExactText, DedupMode::ContentHash] {
            let config = CrawlConfig::builder().dedup(mode).build().unwrap();
            let page = extract(html, &config);
            assert_eq!(page.blocks.len(), 1, "mode {mode:?}");
        }
    }

    #[test]
    fn dedup_off_keeps_duplicates() {
        let html = "<main><p>Repeated line</p><p>Repeated line</p></main>";
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(page.blocks.len(), 2);
    }

    #[test]
    fn ad_containers_are_dropped_by_token() {
        let html = r#"<main>
            <div class="advertisement"><p>Buy things now please</p></div>
            <div class="ad-slot"><p>Also an advert block</p></div>
            <div class="header"><p>Header text survives the ad filter</p></div>
        </main>"#;
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(page.blocks.len(), 1);
        assert!(page.blocks[0].text().unwrap().contains("survives"));
    }

    #[test]
    fn image_cap_applies_to_images_only() {
        let config = CrawlConfig::builder().max_images_per_page(2).build().unwrap();
        let html = r#"<main>
            <img src="/1.png"><img src="/2.png"><img src="/3.png">
            <p>Text is not capped</p>
        </main>"#;
        let page = extract(html, &config);
        let images = page
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Image { .. }))
            .count();
        assert_eq!(images, 2);
        assert_eq!(page.blocks.len(), 3);
    }

    #[test]
    fn data_src_is_a_fallback_and_relative_urls_resolve() {
        let html = r#"<main><img data-src="images/lazy.jpg"><p>some text</p></main>"#;
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(
            page.blocks[0],
            Block::Image {
                url: Url::parse("https://example.com/articles/images/lazy.jpg").unwrap(),
                alt: None
            }
        );
    }

    #[test]
    fn non_http_sources_are_skipped() {
        let html = r#"<main><img src="data:image/png;base64,AAAA"><p>text</p></main>"#;
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(page.blocks, vec![Block::Paragraph("text".into())]);
    }

    #[test]
    fn paragraph_inside_list_item_not_doubled() {
        let html = "<main><ul><li><p>Wrapped item</p></li></ul></main>";
        let page = extract(html, &CrawlConfig::default());
        assert_eq!(page.blocks, vec![Block::ListItem("Wrapped item".into())]);
    }
}
