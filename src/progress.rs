//! Progress-callback trait for batch rendering events.
//!
//! Inject an [`Arc<dyn RenderProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to hear about
//! each label as the batch layout places it. The CLI uses this to drive a
//! progress bar; a web handler can ignore it.
//!
//! # Example
//!
//! ```rust
//! use label_pdf::{RenderConfig, RenderProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     breaks: AtomicUsize,
//! }
//!
//! impl RenderProgressCallback for PageCounter {
//!     fn on_page_break(&self, _page_num: usize) {
//!         self.breaks.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { breaks: AtomicUsize::new(0) });
//! let config = RenderConfig::builder()
//!     .progress_callback(counter as Arc<dyn RenderProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch layout as it places labels.
///
/// All methods default to no-ops so implementors only override what they
/// need. Implementations must be `Send + Sync`: the async wrappers run the
/// layout on a blocking-pool thread.
pub trait RenderProgressCallback: Send + Sync {
    /// Called once before the first label is placed.
    fn on_render_start(&self, total_labels: usize) {
        let _ = total_labels;
    }

    /// Called after a label's band has been laid out.
    ///
    /// # Arguments
    /// * `index`   : 0-based position in the input
    /// * `page_num`: 1-indexed page the band landed on
    fn on_label_placed(&self, index: usize, page_num: usize) {
        let _ = (index, page_num);
    }

    /// Called when a band does not fit and a new page is started.
    ///
    /// `page_num` is the 1-indexed number of the new page.
    fn on_page_break(&self, page_num: usize) {
        let _ = page_num;
    }

    /// Called once after the document bytes have been produced.
    fn on_render_complete(&self, total_labels: usize, page_count: usize) {
        let _ = (total_labels, page_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenderProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn RenderProgressCallback>;
