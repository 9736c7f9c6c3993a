//! Error types for the web2docx library.
//!
//! Two distinct error types reflect two distinct failure domains:
//!
//! * [`Web2DocxError`] - **Fatal**: the crawl cannot proceed at all
//!   (spreadsheet missing, URL column absent, output directory not writable).
//!   Returned as `Err(Web2DocxError)` from the top-level `crawl*` functions.
//!
//! * [`PageError`] - **Non-fatal**: a single URL failed (network error,
//!   non-2xx status) but the remaining URLs are fine. Stored inside
//!   [`crate::output::PageResult`] so callers can inspect partial success
//!   rather than losing the whole run to one bad page.
//!
//! Image failures are a third, even narrower domain: they never become an
//! error value at all. A failed image turns into a placeholder block in the
//! rendered document and the page continues (see `pipeline::image`).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the web2docx library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Web2DocxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Spreadsheet file was not found at the given path.
    #[error("Spreadsheet not found: '{path}'\nCheck the path exists and is readable.")]
    SpreadsheetNotFound { path: PathBuf },

    /// The spreadsheet exists but could not be opened as a workbook.
    #[error("Failed to read spreadsheet '{path}': {detail}")]
    SpreadsheetRead { path: PathBuf, detail: String },

    /// The requested worksheet does not exist in the workbook.
    #[error("Worksheet '{sheet}' not found.\nAvailable sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// The URL column header was not found in the first row.
    #[error("Column '{column}' not found in the header row.\nFound columns: {available}")]
    ColumnNotFound { column: String, available: String },

    /// The URL column exists but contains no non-empty cells.
    #[error("No URLs found in '{path}'\nThe URL column is present but every cell is empty.")]
    NoUrls { path: PathBuf },

    // ── Network setup ─────────────────────────────────────────────────────
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a document file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The docx container could not be assembled.
    #[error("Failed to build docx '{path}': {detail}")]
    DocxBuild { path: PathBuf, detail: String },

    // ── Aggregate errors ──────────────────────────────────────────────────
    /// Every URL failed; no document was produced.
    #[error("All {total} pages failed.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single URL.
///
/// Stored in [`crate::output::PageResult`] when a page fails.
/// The overall crawl continues to the next URL; there is no retry.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The cell content is not a parseable absolute URL.
    #[error("'{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network-level failure (DNS, connect, timeout, TLS).
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("Failed to read body of '{url}': {reason}")]
    Body { url: String, reason: String },
}
