//! The read-only log of retired sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One retired section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the section that was displayed.
    pub section: String,
    /// Its expanded, link-disabled markup at retirement.
    pub markup: String,
    /// When it was retired.
    pub retired_at: DateTime<Utc>,
}

/// Append-only, ordered log of previously displayed sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a retired section at the end. The only mutation history allows.
    pub(crate) fn push(&mut self, section: impl Into<String>, markup: impl Into<String>) {
        self.entries.push(HistoryEntry {
            section: section.into(),
            markup: markup.into(),
            retired_at: Utc::now(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recently retired entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been retired yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Section ids in retirement order.
    pub fn sections(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.section.as_str()).collect()
    }

    /// All retired markup concatenated, as the history region shows it.
    pub fn to_markup(&self) -> String {
        self.entries.iter().map(|e| e.markup.as_str()).collect()
    }

    /// Export as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
