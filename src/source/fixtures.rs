//! JSON fixture directory source.
//!
//! Each context reads `<dir>/<context-name>.json`, which holds a JSON array of
//! that context's records:
//!
//! ```text
//! fixtures/
//! ├── incidents.json
//! ├── service-requests.json
//! ├── notifications.json
//! ├── smart-queue.json
//! ├── pulse-metrics.json
//! └── users.json
//! ```

use super::DataSource;
use crate::app::{ContextKind, Payload};
use crate::domain::error::{DeskError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Reads context payloads from JSON files.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    /// Creates a source reading from `dir`.
    ///
    /// The directory is not checked until the first fetch.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File a context is read from.
    #[must_use]
    pub fn file_for(&self, kind: ContextKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.as_str()))
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Source(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| DeskError::Source(format!("failed to parse {}: {e}", path.display())))
    }
}

impl DataSource for FixtureSource {
    fn fetch(&self, kind: ContextKind) -> Result<Payload> {
        let path = self.file_for(kind);
        let _span = tracing::debug_span!("fixture_fetch", context = %kind, path = ?path).entered();

        let payload = match kind {
            ContextKind::Incidents => Payload::Incidents(Self::read(&path)?),
            ContextKind::ServiceRequests => Payload::ServiceRequests(Self::read(&path)?),
            ContextKind::Notifications => Payload::Notifications(Self::read(&path)?),
            ContextKind::SmartQueue => Payload::SmartQueue(Self::read(&path)?),
            ContextKind::PulseMetrics => Payload::PulseMetrics(Self::read(&path)?),
            ContextKind::Users => Payload::Users(Self::read(&path)?),
        };

        tracing::debug!(records = payload.len(), "fixture loaded");
        Ok(payload)
    }
}
