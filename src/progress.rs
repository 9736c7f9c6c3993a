//! Progress-callback trait for per-URL crawl events.
//!
//! Inject an [`Arc<dyn CrawlProgressCallback>`] via
//! [`crate::config::CrawlConfigBuilder::progress_callback`] to receive
//! events as the driver works through the URL list. The CLI uses this to
//! drive its progress bar; library callers can forward events to a channel,
//! a log, or a UI without the library knowing how.
//!
//! The crawl is strictly sequential, so events for one run always arrive in
//! order and from one task at a time. The trait is still `Send + Sync` so a
//! single callback can be shared across crawls.

use std::sync::Arc;

/// Called by the crawl driver as it processes each URL.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait CrawlProgressCallback: Send + Sync {
    /// Called once after the URL list has been loaded.
    fn on_crawl_start(&self, total_urls: usize) {
        let _ = total_urls;
    }

    /// Called just before a URL is fetched.
    fn on_page_start(&self, index: usize, total_urls: usize, url: &str) {
        let _ = (index, total_urls, url);
    }

    /// Called when a page has been rendered (and, in per-URL mode, saved).
    ///
    /// `text_blocks` counts headings, paragraphs, and list items that made
    /// it into the document.
    fn on_page_complete(&self, index: usize, total_urls: usize, text_blocks: usize) {
        let _ = (index, total_urls, text_blocks);
    }

    /// Called when a URL fails at the page boundary.
    fn on_page_error(&self, index: usize, total_urls: usize, error: &str) {
        let _ = (index, total_urls, error);
    }

    /// Called once after every URL has been attempted.
    fn on_crawl_complete(&self, total_urls: usize, success_count: usize) {
        let _ = (total_urls, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CrawlProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CrawlConfig`].
pub type ProgressCallback = Arc<dyn CrawlProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        final_success: AtomicUsize,
    }

    impl CrawlProgressCallback for TrackingCallback {
        fn on_page_start(&self, _index: usize, _total: usize, _url: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_page_complete(&self, _index: usize, _total: usize, _blocks: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_page_error(&self, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_crawl_complete(&self, _total: usize, success_count: usize) {
            self.final_success.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_crawl_start(3);
        cb.on_page_start(1, 3, "https://example.com");
        cb.on_page_complete(1, 3, 12);
        cb.on_page_error(2, 3, "HTTP 404");
        cb.on_crawl_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_success: AtomicUsize::new(0),
        };
        cb.on_crawl_start(2);
        cb.on_page_start(1, 2, "https://example.com/a");
        cb.on_page_complete(1, 2, 5);
        cb.on_page_start(2, 2, "https://example.com/b");
        cb.on_page_error(2, 2, "timeout");
        cb.on_crawl_complete(2, 1);

        assert_eq!(cb.starts.load(Ordering::SeqCst), 2);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 1);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
        assert_eq!(cb.final_success.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_crawl_start(10);
        cb.on_page_start(1, 10, "https://example.com");
    }
}
