//! Data sources feeding the dashboard contexts.
//!
//! Fetching is supplied by the caller: anything implementing [`DataSource`]
//! can back the dashboard. The crate ships [`FixtureSource`], which reads JSON
//! files from a directory, and implements the trait for plain closures.
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{ContextKind, Payload};
//! use servicedesk_state::source::{DataSource, outcome_event};
//! use servicedesk_state::DeskError;
//!
//! let source = |kind: ContextKind| match kind {
//!     ContextKind::Users => Ok(Payload::Users(vec![])),
//!     other => Err(DeskError::Source(format!("{other} is offline"))),
//! };
//!
//! let event = outcome_event(ContextKind::Incidents, source.fetch(ContextKind::Incidents));
//! assert!(matches!(event, servicedesk_state::Event::LoadFailed { .. }));
//! ```

pub mod fixtures;

pub use fixtures::FixtureSource;

use crate::app::{ContextKind, Event, Payload};
use crate::domain::error::{DeskError, Result};

/// Produces fresh data for a context.
pub trait DataSource {
    /// Fetches the current records of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be obtained. The error's display
    /// text becomes the context's error message.
    fn fetch(&self, kind: ContextKind) -> Result<Payload>;
}

impl<F> DataSource for F
where
    F: Fn(ContextKind) -> Result<Payload>,
{
    fn fetch(&self, kind: ContextKind) -> Result<Payload> {
        self(kind)
    }
}

/// Converts a fetch outcome into the event the handler expects.
///
/// This is where fetch failures stop being errors: they become the message of
/// a [`Event::LoadFailed`]. A payload for a different context than requested
/// is treated as a failure of the requested one.
#[must_use]
pub fn outcome_event(kind: ContextKind, outcome: Result<Payload>) -> Event {
    match outcome {
        Ok(payload) if payload.kind() == kind => Event::Loaded(payload),
        Ok(payload) => Event::LoadFailed {
            kind,
            message: DeskError::Source(format!(
                "expected {kind} data, received {}",
                payload.kind()
            ))
            .to_string(),
        },
        Err(e) => Event::LoadFailed {
            kind,
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_becomes_loaded() {
        let event = outcome_event(ContextKind::Users, Ok(Payload::Users(vec![])));
        assert_eq!(event, Event::Loaded(Payload::Users(vec![])));
    }

    #[test]
    fn error_becomes_message() {
        let event = outcome_event(
            ContextKind::Users,
            Err(DeskError::Source("network down".to_string())),
        );
        assert_eq!(
            event,
            Event::LoadFailed {
                kind: ContextKind::Users,
                message: "Source error: network down".to_string(),
            }
        );
    }

    #[test]
    fn mismatched_payload_fails_requested_context() {
        let event = outcome_event(ContextKind::Incidents, Ok(Payload::Users(vec![])));
        let Event::LoadFailed { kind, message } = event else {
            panic!("expected a failure event");
        };
        assert_eq!(kind, ContextKind::Incidents);
        assert!(message.contains("received users"));
    }
}
