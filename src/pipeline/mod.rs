//! Pipeline stages for the spreadsheet-to-docx crawl.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. the content-selection heuristics) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ fetch ──▶ select ──▶ extract ──▶ image ──▶ render
//! (xlsx)    (HTTP)    (region)   (blocks)    (resize)  (docx)
//! ```
//!
//! 1. [`input`]   - read the URL column of the spreadsheet (calamine)
//! 2. [`fetch`]   - sequential HTTP GETs for pages and image bytes
//! 3. [`select`]  - pick the page's main-content region via an ordered list
//!    of selector strategies; never fails (falls back to the whole document)
//! 4. [`extract`] - classify the region's elements into heading / paragraph /
//!    list-item / image blocks, with optional deduplication and length filter
//! 5. [`image`]   - decode, downscale to the bounding box, re-encode PNG;
//!    failures become placeholder blocks, never page errors
//! 6. [`render`]  - append blocks into a docx and save it atomically

pub mod extract;
pub mod fetch;
pub mod image;
pub mod input;
pub mod render;
pub mod select;
