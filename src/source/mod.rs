//! Import sources delivering whole batches of points and observations.
//!
//! A source hands out complete [`ImportDocument`]s; every document replaces
//! the previous import wholesale. Files are polled for modification, while
//! channel sources receive documents pushed by an embedding application.

mod channel;
mod document;
mod file;

pub use channel::{ChannelSource, DocumentSender};
pub use document::{ImportDocument, SensorBatch};
pub use file::FileSource;

use std::fmt::Debug;

/// Trait for receiving import documents from various sources.
///
/// # Example
///
/// ```
/// use deformwatch::{FileSource, ImportSource};
///
/// let mut source = FileSource::new("monitoring.json");
/// if let Some(document) = source.poll() {
///     println!("Got {} points", document.point_count());
/// }
/// ```
pub trait ImportSource: Send + Debug {
    /// Poll for a new document.
    ///
    /// Returns `Some(document)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ImportDocument>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;
}
