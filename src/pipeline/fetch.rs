//! HTTP fetching for pages and images.
//!
//! One [`reqwest::Client`] is built per crawl and reused for every request,
//! so connection pooling works across the sequential URL loop. The crawl
//! has no retry policy: a request either succeeds within its timeout or the
//! failure is recorded and the driver moves on.
//!
//! Page failures and image failures are reported differently on purpose.
//! A page failure is a [`PageError`] the driver stores in the crawl report;
//! an image failure is just a reason string, because the only thing done
//! with it is rendering a placeholder block.

use crate::config::CrawlConfig;
use crate::error::{PageError, Web2DocxError};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Build the shared HTTP client from the crawl config.
pub fn build_client(config: &CrawlConfig) -> Result<reqwest::Client, Web2DocxError> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| Web2DocxError::HttpClient(e.to_string()))
}

/// Fetch a page and return its body as text.
///
/// Non-2xx statuses and transport errors are [`PageError`]s - the caller
/// records them and continues with the next URL.
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<String, PageError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| PageError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| PageError::Body {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    debug!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}

/// Fetch raw bytes (images).
///
/// Errors come back as strings: the image stage turns them into placeholder
/// text, never into a page failure.
pub async fn fetch_bytes(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    debug!("Fetched image {} ({} bytes)", url, bytes.len());
    Ok(bytes.to_vec())
}
