//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where the crate keeps its files (snapshots, logs) and
//! expands user-supplied paths from the configuration.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, resolve_path};
