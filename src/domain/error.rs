//! Error types for the service desk state layer.
//!
//! This module defines the centralized error type [`DeskError`] and a type alias
//! [`Result`] used by infrastructure code (storage, configuration, data sources).
//! The async state shape itself never carries a `DeskError`; failures are turned
//! into display strings at the context boundary.

use thiserror::Error;

/// The main error type for service desk state operations.
///
/// Most variants carry a description of the failure. I/O errors convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use servicedesk_state::DeskError;
///
/// fn read_fixture() -> Result<(), DeskError> {
///     Err(DeskError::Source("fixture directory missing".to_string()))
/// }
///
/// assert!(read_fixture().is_err());
/// ```
#[derive(Debug, Error)]
pub enum DeskError {
    /// Snapshot storage operation failed.
    ///
    /// Occurs when reading, parsing or writing the snapshot file fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The work item schema document could not be loaded.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A data source failed to produce a payload.
    ///
    /// This is the "fetch failure" of the dashboard. Contexts store its
    /// display text as their error message.
    #[error("Source error: {0}")]
    Source(String),

    /// A fetched payload violates the work item schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report or summary output could not be produced.
    #[error("Output error: {0}")]
    Output(String),
}

/// A specialized `Result` type for service desk state operations.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = DeskError::Validation("incident 4 has status fulfilled".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: incident 4 has status fulfilled"
        );
    }

    #[test]
    fn output_errors_name_their_category() {
        let err = DeskError::Output("failed to serialize summaries".to_string());
        assert_eq!(err.to_string(), "Output error: failed to serialize summaries");
    }

    #[test]
    fn io_errors_convert() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(DeskError::Io(_))));
    }
}
