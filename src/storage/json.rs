//! JSON file-based snapshot store.
//!
//! This module provides a human-readable snapshot implementation using JSON
//! serialization. It uses atomic file writes (write-to-temp + rename) so a crash
//! mid-write never leaves a truncated snapshot file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes every snapshot
//! - **Best for**: a handful of contexts saved after each load

use crate::app::ContextKind;
use crate::domain::error::{DeskError, Result};
use crate::storage::backend::SnapshotStore;
use crate::storage::models::SnapshotRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const STORAGE_VERSION: u32 = 1;

/// JSON storage container format.
///
/// Snapshots are keyed by context name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    contexts: BTreeMap<String, SnapshotRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            contexts: BTreeMap::new(),
        }
    }
}

/// JSON file snapshot store.
///
/// The whole file is kept in memory and rewritten on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "contexts": {
///     "incidents": {
///       "saved_at": "2024-05-01T10:00:00Z",
///       "state": { "data": [], "loading": false, "error": null, ... }
///     }
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonSnapshotStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,
}

impl JsonSnapshotStore {
    /// Creates or opens a JSON snapshot store.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the file
    /// is created on the first save. Parent directories are created
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or an unsupported version
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing snapshot store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty snapshot store");
            StorageData::default()
        };

        tracing::debug!(snapshot_count = data.contexts.len(), "snapshot store initialized");

        Ok(Self { file_path, data })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| DeskError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != STORAGE_VERSION {
            return Err(DeskError::Storage(format!(
                "unsupported snapshot version {} (expected {STORAGE_VERSION})",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            snapshots = data.contexts.len(),
            "loaded snapshot data"
        );

        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path.
    fn save_to_file(&self) -> Result<()> {
        tracing::debug!(path = ?self.file_path, "saving snapshot data");

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| DeskError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save_snapshot(&mut self, kind: ContextKind, state: serde_json::Value) -> Result<()> {
        let _span = tracing::debug_span!("json_save_snapshot", context = %kind).entered();

        self.data
            .contexts
            .insert(kind.as_str().to_string(), SnapshotRecord::new(state));
        self.save_to_file()
    }

    fn load_snapshot(&self, kind: ContextKind) -> Result<Option<SnapshotRecord>> {
        let record = self.data.contexts.get(kind.as_str()).cloned();
        tracing::debug!(context = %kind, found = record.is_some(), "snapshot lookup complete");
        Ok(record)
    }

    fn load_all(&self) -> Result<Vec<(ContextKind, SnapshotRecord)>> {
        let records = self
            .data
            .contexts
            .iter()
            .filter_map(|(name, record)| {
                let Some(kind) = ContextKind::from_name(name) else {
                    tracing::warn!(context = %name, "skipping snapshot for unknown context");
                    return None;
                };
                Some((kind, record.clone()))
            })
            .collect();
        Ok(records)
    }

    fn remove_snapshot(&mut self, kind: ContextKind) -> Result<bool> {
        let _span = tracing::debug_span!("json_remove_snapshot", context = %kind).entered();

        if self.data.contexts.remove(kind.as_str()).is_none() {
            return Ok(false);
        }
        self.save_to_file()?;
        Ok(true)
    }
}
