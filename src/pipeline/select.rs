//! Content-region selection: find the sub-tree holding the article body.
//!
//! The heuristic is an ordered list of strategies evaluated in sequence -
//! first match wins, and the last strategy always matches, so selection
//! never fails:
//!
//! 1. `<main>` - the page says where its content is
//! 2. `<article>` - ditto
//! 3. the `<div>`/`<section>` with a content-like class or id
//!    (`content`, `article`, `post`, `main`, `body`) holding the most text,
//!    provided it holds enough text to plausibly be an article
//! 4. `<body>`, or the document root for fragments without one
//!
//! The strategy name is kept alongside the element for diagnostics only.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Containers below this much collapsed text are navigation chrome, not
/// article bodies, and do not win strategy 3.
const MIN_CONTAINER_TEXT: usize = 200;

static MAIN_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTAINER_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div, section").unwrap());
static BODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static H1_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

static CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(content|article|post|main|body)").unwrap());

/// The chosen content region plus the name of the strategy that found it.
pub struct SelectedRegion<'a> {
    pub element: ElementRef<'a>,
    pub strategy: &'static str,
}

type Strategy = for<'a> fn(&'a Html) -> Option<ElementRef<'a>>;

/// Ordered fallback chain. Evaluated top to bottom; `find_body` only fails
/// on body-less fragments, which the document-root fallback below covers.
static STRATEGIES: &[(&str, Strategy)] = &[
    ("main", find_main),
    ("article", find_article),
    ("content-container", find_content_container),
    ("body", find_body),
];

/// Pick the main content region of a parsed page. Never fails.
pub fn select_content_region(doc: &Html) -> SelectedRegion<'_> {
    for (name, strategy) in STRATEGIES {
        if let Some(element) = strategy(doc) {
            debug!("Content region selected by strategy '{}'", name);
            return SelectedRegion {
                element,
                strategy: name,
            };
        }
    }
    SelectedRegion {
        element: doc.root_element(),
        strategy: "document",
    }
}

/// Resolve the page title: first `<h1>` inside the region, else `<title>`.
pub fn page_title(doc: &Html, region: ElementRef<'_>) -> Option<String> {
    region
        .select(&H1_SEL)
        .next()
        .map(collapsed_text)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            doc.select(&TITLE_SEL)
                .next()
                .map(collapsed_text)
                .filter(|t| !t.is_empty())
        })
}

/// Descendant text with runs of whitespace collapsed to single spaces.
pub fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_main(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&MAIN_SEL).next()
}

fn find_article(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&ARTICLE_SEL).next()
}

/// Best-scoring generic container: class/id matches the content pattern and
/// it holds the most collapsed text of all such candidates.
fn find_content_container(doc: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<ElementRef<'_>> = None;
    let mut best_len = 0usize;

    for candidate in doc.select(&CONTAINER_SEL) {
        let id = candidate.value().id().unwrap_or("");
        let classes = candidate.value().classes().collect::<Vec<_>>().join(" ");
        let combined = format!("{id} {classes}");
        if !CONTENT_RE.is_match(&combined) {
            continue;
        }

        let len = collapsed_text(candidate).len();
        if len > best_len {
            best_len = len;
            best = Some(candidate);
        }
    }

    if best_len >= MIN_CONTAINER_TEXT {
        best
    } else {
        None
    }
}

fn find_body(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&BODY_SEL).next()
}
