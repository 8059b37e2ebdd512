//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber, setting up the pipeline from
//! `tracing` macros to the rotating log file.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "servicedesk-state.log";

/// Initializes the tracing subscriber with file-based output.
///
/// Sets up a tracing subscriber pipeline that:
/// 1. Filters spans and events by the configured level
/// 2. Formats them as plain text lines with span context
/// 3. Writes to a rotating file with backups
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable if set
/// 2. `config.trace_level` if set
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created
/// - Only the first call takes effect
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let writer = FileWriter::new(data_dir.join(LOG_FILE_NAME));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer),
    );

    let _ = subscriber.try_init();
}
