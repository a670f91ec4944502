//! Import documents pushed by an embedding application.

use tokio::sync::watch;
use tracing::warn;

use super::{ImportDocument, ImportSource};

/// Sending half paired with a [`ChannelSource`]. `None` means nothing has
/// been imported yet.
pub type DocumentSender = watch::Sender<Option<ImportDocument>>;

/// An import source fed through a watch channel.
///
/// Only the latest pushed document is kept; documents pushed between two
/// polls replace each other. Once the sender is dropped the source reports
/// an error and stops delivering.
///
/// # Example
///
/// ```
/// use deformwatch::{ChannelSource, ImportDocument, ImportSource};
///
/// let (tx, mut source) = ChannelSource::create("survey-gateway");
/// assert!(source.poll().is_none());
///
/// tx.send_replace(Some(ImportDocument::default()));
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<ImportDocument>>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Wrap an existing receiver. A document already waiting in the channel
    /// is delivered by the first poll.
    pub fn new(mut receiver: watch::Receiver<Option<ImportDocument>>, name: &str) -> Self {
        if receiver.borrow().is_some() {
            receiver.mark_changed();
        }
        Self {
            receiver,
            description: format!("channel: {}", name),
            closed: false,
        }
    }

    /// Create an empty channel and the source reading from it.
    pub fn create(name: &str) -> (DocumentSender, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, name))
    }
}

impl ImportSource for ChannelSource {
    fn poll(&mut self) -> Option<ImportDocument> {
        match self.receiver.has_changed() {
            Ok(true) => self.receiver.borrow_and_update().clone(),
            Ok(false) => None,
            Err(_) => {
                if !self.closed {
                    warn!(source = %self.description, "import channel closed");
                    self.closed = true;
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("sender dropped")
    }
}
