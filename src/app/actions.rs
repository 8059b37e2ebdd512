//! Actions representing side effects requested by the event handler.
//!
//! The handler never fetches or writes anything itself. It returns actions, and
//! the caller that owns the data source and snapshot store performs them. The
//! outcome of a [`Action::Fetch`] re-enters the handler as an
//! [`Event::Loaded`](crate::app::Event::Loaded) or
//! [`Event::LoadFailed`](crate::app::Event::LoadFailed).
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{Action, ContextKind};
//!
//! let actions = vec![
//!     Action::Fetch(ContextKind::Incidents),
//!     Action::SaveSnapshot(ContextKind::Incidents),
//! ];
//! assert_eq!(actions[0].kind(), ContextKind::Incidents);
//! ```

use super::kinds::ContextKind;

/// Side effects to run after an event has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fetches fresh data for a context.
    ///
    /// The context is already marked loading when this action is emitted.
    Fetch(ContextKind),

    /// Persists a context's current state.
    ///
    /// Emitted after a successful load when snapshot persistence is enabled.
    SaveSnapshot(ContextKind),
}

impl Action {
    /// The context the action concerns.
    #[must_use]
    pub const fn kind(self) -> ContextKind {
        match self {
            Self::Fetch(kind) | Self::SaveSnapshot(kind) => kind,
        }
    }
}
