//! Progress-callback trait for generation and layout events.
//!
//! Inject an [`Arc<dyn DeckProgressCallback>`] via
//! [`crate::config::DeckConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline generates content and lays out sections.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, a database record, or a terminal
//! progress bar without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so the same callback
//! can be shared across runs on different tasks.
//!
//! # Example
//!
//! ```rust
//! use idea2deck::{DeckProgressCallback, DeckConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl DeckProgressCallback for CountingCallback {
//!     fn on_section_complete(&self, index: usize, total: usize, name: &str, image: bool) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Section {}/{} '{}' done (photo: {})", index, total, name, image);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = DeckConfig::builder()
//!     .progress_callback(counter as Arc<dyn DeckProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as a run progresses.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
///
/// Events arrive strictly in order: one `on_generation_start`, one
/// `on_content_ready`, then one start/complete pair per canonical section in
/// document order, then one `on_deck_complete`.
pub trait DeckProgressCallback: Send + Sync {
    /// Called once just before the completion request is sent.
    ///
    /// # Arguments
    /// * `model` — identifier of the model being asked
    fn on_generation_start(&self, model: &str) {
        let _ = model;
    }

    /// Called once when the model reply has been parsed.
    ///
    /// # Arguments
    /// * `sections`      — number of sections in the parsed deck
    /// * `used_fallback` — true when the reply was unparseable and every
    ///   section carries placeholder text
    fn on_content_ready(&self, sections: usize, used_fallback: bool) {
        let _ = (sections, used_fallback);
    }

    /// Called just before a section's illustration lookup begins.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in document order
    /// * `total` — total number of canonical sections
    /// * `name`  — section name
    fn on_section_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a section's lookup finished (successfully or not).
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in document order
    /// * `total` — total number of canonical sections
    /// * `name`  — section name
    /// * `image` — true when a photo was fetched for this section
    fn on_section_complete(&self, index: usize, total: usize, name: &str, image: bool) {
        let _ = (index, total, name, image);
    }

    /// Called once after the document has been written to disk.
    ///
    /// # Arguments
    /// * `pdf_path` — absolute path of the finished PDF
    fn on_deck_complete(&self, pdf_path: &Path) {
        let _ = pdf_path;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl DeckProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DeckConfig`].
pub type ProgressCallback = Arc<dyn DeckProgressCallback>;
