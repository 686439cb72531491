//! Result history.

use chrono::{DateTime, Utc};
use dicedr_core::limits::HISTORY_MAX_ITEMS;
use serde::{Deserialize, Serialize};

/// Immutable record of one completed run.
///
/// `method_label` is captured in the language active at creation time and is
/// never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    value: String,
    method_id: String,
    method_label: String,
    share_state: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        method_id: impl Into<String>,
        method_label: impl Into<String>,
        share_state: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            value: value.into(),
            method_id: method_id.into(),
            method_label: method_label.into(),
            share_state: share_state.into(),
            timestamp,
        }
    }

    /// The outcome.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The method that produced the outcome.
    #[must_use]
    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    /// The method's title at creation time.
    #[must_use]
    pub fn method_label(&self) -> &str {
        &self.method_label
    }

    /// Share token reconstructing the method state after the run.
    #[must_use]
    pub fn share_state(&self) -> &str {
        &self.share_state
    }

    /// When the run completed.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Stored entries must carry a value, a method id and a label.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.value.is_empty() && !self.method_id.is_empty() && !self.method_label.is_empty()
    }

    /// Coarse relative age: "just now", "5m ago", "3h ago", "2d ago".
    #[must_use]
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let seconds = (now - self.timestamp).num_seconds().max(0);
        match seconds {
            0..60 => "just now".to_owned(),
            60..3600 => format!("{}m ago", seconds / 60),
            3600..86_400 => format!("{}h ago", seconds / 3600),
            _ => format!("{}d ago", seconds / 86_400),
        }
    }
}

/// Most-recent-first sequence of entries, capped at [`HISTORY_MAX_ITEMS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    /// An empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `entry`, evicting the oldest entries beyond the cap.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.0.insert(0, entry);
        self.0.truncate(HISTORY_MAX_ITEMS);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops anything beyond the cap (used when loading foreign data).
    pub(crate) fn enforce_cap(&mut self) {
        self.0.truncate(HISTORY_MAX_ITEMS);
    }
}
