use anyhow::Result;
use tracing::{info, warn};

use crate::clipboard::Clipboard;
use crate::convert::convert;
use crate::history::{HistoryEntry, HistoryStore};

/// One user session: the history store plus the mutable state the UI
/// layer binds to (current output, search term), held as plain fields
/// behind explicit operations. Collaborators are injected so nothing
/// here touches a platform API directly.
pub struct Session {
    store: HistoryStore,
    clipboard: Box<dyn Clipboard>,
    search_term: String,
    json_text: String,
}

impl Session {
    pub fn new(store: HistoryStore, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            store,
            clipboard,
            search_term: String::new(),
            json_text: String::new(),
        }
    }

    /// Convert `csv`, record the result in history, report the pretty
    /// JSON to the clipboard, and return it. Invalid input surfaces as
    /// [`InvalidInputError`](crate::convert::InvalidInputError)
    /// (downcastable from the returned error) and leaves every field and
    /// the persisted store untouched; a failed persist is an error, a
    /// failed clipboard write only a warning.
    pub fn convert(&mut self, csv: &str) -> Result<String> {
        let records = convert(csv)?;
        let rows = records.len();
        let pretty = serde_json::to_string_pretty(&records)?;

        self.store.append(HistoryEntry::new(csv, records))?;
        if let Err(err) = self.clipboard.write_text(&pretty) {
            warn!(%err, "clipboard write failed");
        }
        self.json_text = pretty.clone();
        info!(rows, "CSV converted to JSON and copied to clipboard");
        Ok(pretty)
    }

    /// The last conversion's pretty JSON, empty before any conversion.
    pub fn json_text(&self) -> &str {
        &self.json_text
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// History entries matching the current search term, in store order.
    pub fn matches(&self) -> Vec<&HistoryEntry> {
        self.store.search(&self.search_term)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.store.entries()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.store.get(id)
    }

    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<()> {
        self.store.rename(id, new_name)
    }

    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.store.remove(id)
    }

    /// Report an entry's raw CSV to the clipboard; unknown ids no-op.
    pub fn copy_csv(&self, id: &str) -> Result<()> {
        match self.store.get(id) {
            Some(entry) => self.clipboard.write_text(&entry.csv),
            None => {
                warn!(id, "copy csv: no such entry");
                Ok(())
            }
        }
    }

    /// Report an entry's pretty-printed records to the clipboard;
    /// unknown ids no-op.
    pub fn copy_json(&self, id: &str) -> Result<()> {
        match self.store.get(id) {
            Some(entry) => {
                let pretty = serde_json::to_string_pretty(&entry.json)?;
                self.clipboard.write_text(&pretty)
            }
            None => {
                warn!(id, "copy json: no such entry");
                Ok(())
            }
        }
    }
}
