//! Snapshot storage abstraction.
//!
//! This module defines the [`SnapshotStore`] trait. The trait is kept to the
//! operations the session lifecycle needs: save after a load, restore at
//! startup, drop a snapshot that no longer decodes.

use crate::app::ContextKind;
use crate::domain::error::Result;
use crate::storage::models::SnapshotRecord;

/// Abstraction over snapshot persistence backends.
///
/// # Implementations
///
/// - [`JsonSnapshotStore`](crate::storage::JsonSnapshotStore): one JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use servicedesk_state::app::ContextKind;
/// use servicedesk_state::storage::{JsonSnapshotStore, SnapshotStore};
/// use std::path::PathBuf;
///
/// let store = JsonSnapshotStore::new(PathBuf::from("/tmp/snapshots.json"))?;
/// let incidents = store.load_snapshot(ContextKind::Incidents)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait SnapshotStore: Send {
    /// Stores the state of a context, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_snapshot(&mut self, kind: ContextKind, state: serde_json::Value) -> Result<()>;

    /// Retrieves the snapshot of a context.
    ///
    /// Returns `Ok(None)` if none was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn load_snapshot(&self, kind: ContextKind) -> Result<Option<SnapshotRecord>>;

    /// Retrieves every stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn load_all(&self) -> Result<Vec<(ContextKind, SnapshotRecord)>>;

    /// Removes the snapshot of a context.
    ///
    /// Returns whether a snapshot existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_snapshot(&mut self, kind: ContextKind) -> Result<bool>;
}
