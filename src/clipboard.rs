use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Where serialized results get reported after a conversion. The
/// converter itself never touches this; the session controller does,
/// and a failing write is logged rather than surfaced.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

impl<C: Clipboard + ?Sized> Clipboard for Arc<C> {
    fn write_text(&self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

/// Discards every write. The CLI uses this: the JSON already goes to
/// stdout, and a terminal pipeline has no clipboard contract.
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        debug!(len = text.len(), "clipboard write discarded");
        Ok(())
    }
}

/// Captures the last written text, for tests and embedders.
#[derive(Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        *self.last.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
