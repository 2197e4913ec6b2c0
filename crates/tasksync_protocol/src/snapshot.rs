//! Snapshot payload: the full export of one user's synchronizable data.

use crate::timestamp::SyncTimestamp;
use serde::{Deserialize, Serialize};

/// A single task in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier, unique within the owning user's data.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
    /// Labels assigned to this task, by label name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// A label definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name, unique within the owning user's data.
    pub name: String,
    /// Optional display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A complete export of a user's synchronizable data plus the timestamp it
/// was produced or accepted.
///
/// Two snapshots exist per sync exchange: the client snapshot submitted in
/// the request body, and the server snapshot holding the authoritative
/// state. `last_sync` is the reconciliation key; the task/label contents
/// are opaque to the decision logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When this snapshot was last considered authoritative.
    #[serde(rename = "lastSync", default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<SyncTimestamp>,
    /// All tasks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
    /// All labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Snapshot {
    /// An empty snapshot with no timestamp.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the snapshot carries any task or label data.
    pub fn has_data(&self) -> bool {
        !self.tasks.is_empty() || !self.labels.is_empty()
    }

    /// Returns a copy of this snapshot stamped with the given `lastSync`.
    pub fn with_last_sync(mut self, last_sync: SyncTimestamp) -> Self {
        self.last_sync = Some(last_sync);
        self
    }
}
