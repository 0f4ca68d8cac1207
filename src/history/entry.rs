use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::convert::Record;

/// One past conversion: the raw input, the records it produced, and a
/// user-editable label. `id`, `csv`, and `json` never change after
/// creation; only `name` does, via [`HistoryStore::rename`].
///
/// [`HistoryStore::rename`]: crate::history::HistoryStore::rename
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub csv: String,
    pub json: Vec<Record>,
}

impl HistoryEntry {
    /// Build a fresh entry with a v4 UUID and an empty label.
    pub fn new(csv: impl Into<String>, json: Vec<Record>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            csv: csv.into(),
            json,
        }
    }
}
