//! Storage layer for persisted context snapshots.
//!
//! Contexts can be persisted after a successful load so that the next session
//! starts from the best-known data instead of empty seeds. Restored data keeps
//! its original fetch time, so the refresh policy still decides when it is
//! fetched again.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Snapshot record type

pub mod backend;
pub mod json;
pub mod models;

pub use backend::SnapshotStore;
pub use json::JsonSnapshotStore;
pub use models::SnapshotRecord;
