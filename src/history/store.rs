use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::entry::HistoryEntry;
use crate::storage::Storage;

/// Ordered, append-only log of past conversions, persisted wholesale
/// through the injected [`Storage`] after every mutation. Insertion
/// order is display order; entries are never reordered.
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    storage: Box<dyn Storage>,
}

impl HistoryStore {
    /// Load the store from `storage`. A missing payload means no history
    /// yet; an unreadable or unparseable payload is logged and treated as
    /// empty rather than surfaced.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let entries = match storage.read() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<HistoryEntry>>(&payload) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(%err, "history payload unparseable; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "history unreadable; starting empty");
                Vec::new()
            }
        };
        debug!(count = entries.len(), "history loaded");
        Self { entries, storage }
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append `entry` and persist the full sequence.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.push(entry);
        self.persist()
    }

    /// Replace the entry matching `id` with a copy whose `name` is
    /// updated. Unknown ids leave the sequence untouched; the store is
    /// persisted either way.
    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.name = new_name.to_string(),
            None => warn!(id, "rename: no such entry"),
        }
        self.persist()
    }

    /// Remove the entry matching `id`, if present; persists either way.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            warn!(id, "remove: no such entry");
        }
        self.persist()
    }

    /// Case-insensitive substring match against each entry's name, raw
    /// CSV, or compact-serialized records, in store order. The empty
    /// term matches everything.
    pub fn search(&self, term: &str) -> Vec<&HistoryEntry> {
        let needle = term.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.csv.to_lowercase().contains(&needle)
                    || serde_json::to_string(&e.json)
                        .map(|json| json.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        let payload =
            serde_json::to_string(&self.entries).context("serializing history")?;
        self.storage
            .write(&payload)
            .context("persisting history")?;
        debug!(count = self.entries.len(), "history persisted");
        Ok(())
    }
}
