//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::PdfToDocxConfigBuilder::progress_callback`] or
//! [`crate::convert::images_to_pdf_with`] to hear about each page as the
//! pipeline produces it. The CLI forwards these events to a terminal
//! progress bar; the library itself only logs.
//!
//! # Example
//!
//! ```rust
//! use pdfimg::{ConversionProgressCallback, PdfToDocxConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, path: &Path) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} → {}", page_num, total_pages, path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = PdfToDocxConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipelines as they produce each page.
///
/// All methods default to no-ops so implementors override only what they
/// need. Conversions are single-threaded; `Send + Sync` lets a callback be
/// shared with a UI thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, before the first page, with the number of pages to produce.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after page `page_num` (1-indexed) is done.
    ///
    /// `path` is the rendered PNG (PDF→Document) or the source image that
    /// was placed on the page (Image→PDF).
    fn on_page_complete(&self, page_num: usize, total_pages: usize, path: &Path) {
        let _ = (page_num, total_pages, path);
    }

    /// Called once the output artifact has been written.
    fn on_conversion_complete(&self, total_pages: usize, output: &Path) {
        let _ = (total_pages, output);
    }
}

/// Shared handle type stored in configs.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}
