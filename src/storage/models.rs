//! Storage record models for the snapshot layer.
//!
//! Snapshots are stored as untyped JSON values so that one store can hold every
//! context regardless of record type. The dashboard decodes them back into the
//! typed state of the matching context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted context state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,

    /// The serialized `AsyncState` of the context.
    pub state: serde_json::Value,
}

impl SnapshotRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use servicedesk_state::storage::SnapshotRecord;
    ///
    /// let record = SnapshotRecord::new(serde_json::json!({"data": []}));
    /// assert!(record.state.is_object());
    /// ```
    #[must_use]
    pub fn new(state: serde_json::Value) -> Self {
        Self {
            saved_at: Utc::now(),
            state,
        }
    }
}
