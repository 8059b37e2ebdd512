//! Servicedesk-state: client-side data lifecycle for an IT service management dashboard.
//!
//! The crate keeps every data domain of the dashboard (incidents, service
//! requests, notifications, the smart queue, pulse metrics and users) in an
//! [`AsyncState`] that tracks data, loading, error and staleness together:
//! - Pure, consuming lifecycle transitions (`loading`, `succeeded`, `failed`, `invalidated`)
//! - Age-based refresh decisions per domain
//! - Last known data kept visible across failures
//! - Work items validated against a typed ITSM schema
//! - Optional JSON snapshots for warm starts

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Action execution
//! │  - Fetches via DataSource (source/)                 │
//! │  - Snapshots via SnapshotStore (storage/)           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Data contexts and refresh policy                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │  ← Core types
//! │  - AsyncState lifecycle                             │
//! │  - ITSM schema and records                          │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Dashboard state machine with event/action model
//! - [`domain`]: Async state, schema, records and errors
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`source`]: Data sources feeding the contexts
//! - [`storage`]: JSON snapshot persistence
//! - [`ui`]: Plain-text status report
//! - [`observability`]: Log file setup
//!
//! # Configuration
//!
//! ```toml
//! data_dir = "~/.local/share/servicedesk-state"
//! fixtures_dir = "fixtures"
//! schema_file = "itsm_schema.toml"
//! persist_snapshots = true
//! trace_level = "debug"
//!
//! [refresh]
//! default_max_age_secs = 300
//!
//! [refresh.max_age_secs]
//! notifications = 30
//! users = 3600
//! ```
//!
//! # Examples
//!
//! ```rust
//! use servicedesk_state::{handle_event, initialize, Action, Config, ContextKind, Event};
//!
//! let mut dashboard = initialize(&Config::default())?;
//!
//! let (_, actions) = handle_event(&mut dashboard, &Event::RefreshAll)?;
//! assert!(actions.contains(&Action::Fetch(ContextKind::Incidents)));
//! assert!(dashboard.incidents.view().loading);
//! # Ok::<(), servicedesk_state::DeskError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod source;
pub mod storage;
pub mod ui;

pub use app::{
    handle_event, Action, ContextKind, DataContext, Dashboard, Event, Payload, RefreshPolicy,
};
pub use domain::{AsyncState, DeskError, ItsmSchema, Phase, Result, Staleness};
pub use runtime::Runtime;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Dashboard configuration.
///
/// Relative paths are resolved against the directory of the configuration
/// file, or the working directory for configurations built in code.
///
/// # Example
///
/// ```rust
/// use servicedesk_state::Config;
///
/// let config = Config::from_toml_str("persist_snapshots = true\ntrace_level = \"debug\"")?;
/// assert!(config.persist_snapshots);
/// assert_eq!(config.fixtures_dir, "fixtures");
/// # Ok::<(), servicedesk_state::DeskError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory for snapshots and logs.
    ///
    /// Default: the platform data directory (see
    /// [`infrastructure::default_data_dir`]).
    pub data_dir: Option<String>,

    /// Directory holding `<context>.json` fixture files. Default: `"fixtures"`
    pub fixtures_dir: String,

    /// TOML file with the ITSM schema. The built-in schema is used when unset.
    pub schema_file: Option<String>,

    /// Whether contexts are written to the snapshot store after each load.
    pub persist_snapshots: bool,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Per-context maximum data age.
    pub refresh: RefreshPolicy,

    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            fixtures_dir: "fixtures".to_string(),
            schema_file: None,
            persist_snapshots: false,
            trace_level: None,
            refresh: RefreshPolicy::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] for malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DeskError::Config(e.to_string()))
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)
            .map_err(|e| DeskError::Config(format!("{}: {e}", path.display())))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.base_dir = parent.to_path_buf();
        }
        Ok(config)
    }

    /// Parses configuration from a flat key/value map.
    ///
    /// Used for `key=value` overrides on the command line. Missing or
    /// unparsable values fall back to the defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `persist_snapshots`: `"true"`/`"false"` → `bool`
    /// - `default_max_age_secs`: String → `u64`
    /// - `max_age.<context>`: String → `u64`, per context
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use servicedesk_state::{Config, ContextKind};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("fixtures_dir".to_string(), "/srv/fixtures".to_string());
    /// map.insert("max_age.users".to_string(), "3600".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.fixtures_dir, "/srv/fixtures");
    /// assert_eq!(config.refresh.max_age(ContextKind::Users), Duration::from_secs(3600));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(map);
        config
    }

    /// Applies `key=value` overrides on top of this configuration.
    ///
    /// A value that does not parse leaves the current setting in place and is
    /// logged as a warning.
    pub fn apply_overrides(&mut self, map: &BTreeMap<String, String>) {
        for (key, value) in map {
            match key.as_str() {
                "data_dir" => self.data_dir = Some(value.clone()),
                "fixtures_dir" => self.fixtures_dir.clone_from(value),
                "schema_file" => self.schema_file = Some(value.clone()),
                "trace_level" => self.trace_level = Some(value.clone()),
                "persist_snapshots" => match value.parse::<bool>() {
                    Ok(persist) => self.persist_snapshots = persist,
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring persist_snapshots override"),
                },
                "default_max_age_secs" => match value.parse::<u64>() {
                    Ok(secs) => self.refresh.default_max_age_secs = secs,
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring default max age override"),
                },
                other => match other.strip_prefix("max_age.") {
                    Some(name) => match value.parse::<u64>() {
                        Ok(secs) => {
                            self.refresh.max_age_secs.insert(name.to_string(), secs);
                        }
                        Err(e) => tracing::warn!(key = %other, error = %e, "ignoring max age override"),
                    },
                    None => tracing::warn!(key = %other, "ignoring unknown configuration key"),
                },
            }
        }
    }

    /// Resolved directory for snapshots and logs.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_deref().map_or_else(infrastructure::default_data_dir, |dir| {
            infrastructure::resolve_path(dir, &self.base_dir)
        })
    }

    /// Resolved fixture directory.
    #[must_use]
    pub fn fixtures_dir(&self) -> PathBuf {
        infrastructure::resolve_path(&self.fixtures_dir, &self.base_dir)
    }

    /// Path of the snapshot file inside the data directory.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir().join("snapshots.json")
    }

    /// Loads the configured schema, or the built-in one when none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema file cannot be read or is invalid.
    pub fn load_schema(&self) -> Result<ItsmSchema> {
        match &self.schema_file {
            Some(file) => ItsmSchema::from_file(infrastructure::resolve_path(file, &self.base_dir)),
            None => Ok(ItsmSchema::default()),
        }
    }
}

/// Builds a dashboard session from configuration.
///
/// Every context starts empty. Nothing is fetched until the caller handles a
/// refresh event.
///
/// # Errors
///
/// Returns an error if the configured schema cannot be loaded.
pub fn initialize(config: &Config) -> Result<Dashboard> {
    let _span = tracing::debug_span!("initialize").entered();

    let schema = config.load_schema()?;
    let dashboard = Dashboard::from_config(config, schema);
    tracing::debug!(
        persist_snapshots = dashboard.persist_snapshots,
        "dashboard initialized"
    );
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.fixtures_dir, "fixtures");
        assert!(!config.persist_snapshots);
        assert!(config.schema_file.is_none());
        assert_eq!(config.refresh, RefreshPolicy::default());
        assert_eq!(config.fixtures_dir(), PathBuf::from("./fixtures"));
    }

    #[test]
    fn parses_refresh_tables() {
        let config = Config::from_toml_str(
            r#"
            [refresh]
            default_max_age_secs = 60

            [refresh.max_age_secs]
            notifications = 15
            "#,
        )
        .unwrap();
        assert_eq!(
            config.refresh.max_age(ContextKind::Notifications),
            Duration::from_secs(15)
        );
        assert_eq!(config.refresh.max_age(ContextKind::Users), Duration::from_secs(60));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::from_toml_str("scan_depth = 4").unwrap_err();
        assert!(matches!(err, DeskError::Config(_)));
    }

    #[test]
    fn map_overrides_fall_back_on_bad_values() {
        let mut map = BTreeMap::new();
        map.insert("persist_snapshots".to_string(), "yes".to_string());
        map.insert("default_max_age_secs".to_string(), "soon".to_string());
        map.insert("trace_level".to_string(), "debug".to_string());

        let config = Config::from_map(&map);
        assert!(!config.persist_snapshots);
        assert_eq!(config.refresh.default_max_age_secs, 300);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn bad_overrides_keep_file_values() {
        let mut config =
            Config::from_toml_str("persist_snapshots = true\n[refresh]\ndefault_max_age_secs = 90\n")
                .unwrap();
        let mut map = BTreeMap::new();
        map.insert("persist_snapshots".to_string(), "yes".to_string());
        map.insert("default_max_age_secs".to_string(), "soon".to_string());
        config.apply_overrides(&map);

        assert!(config.persist_snapshots);
        assert_eq!(config.refresh.default_max_age_secs, 90);

        map.insert("persist_snapshots".to_string(), "false".to_string());
        config.apply_overrides(&map);
        assert!(!config.persist_snapshots);
    }

    #[test]
    fn file_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "fixtures_dir = \"data\"\ndata_dir = \"/var/desk\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.fixtures_dir(), dir.path().join("data"));
        assert_eq!(config.data_dir(), PathBuf::from("/var/desk"));
        assert_eq!(config.snapshot_path(), PathBuf::from("/var/desk/snapshots.json"));
    }

    #[test]
    fn initialize_loads_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("schema.toml"),
            "[incident]\nstatuses = [\"new\", \"closed\"]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("desk.toml"), "schema_file = \"schema.toml\"\n").unwrap();

        let config = Config::from_file(dir.path().join("desk.toml")).unwrap();
        let dashboard = initialize(&config).unwrap();
        assert!(dashboard.schema.request.is_none());
    }

    #[test]
    fn initialize_reports_missing_schema() {
        let config = Config {
            schema_file: Some("/nonexistent/schema.toml".to_string()),
            ..Config::default()
        };
        assert!(initialize(&config).is_err());
    }
}
