//! Logging with file-based output.
//!
//! The crate logs through `tracing` macros and spans. This module wires them to
//! a `tracing-subscriber` pipeline:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → servicedesk-state.log
//! ```
//!
//! # Features
//!
//! - **File Output**: `<data_dir>/servicedesk-state.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Level Control**: `RUST_LOG`, then `trace_level`, then `info`
//!
//! # Usage
//!
//! ```rust,no_run
//! use servicedesk_state::observability::init_tracing;
//! use servicedesk_state::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("dashboard starting");
//! ```
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
