//! Event handling and state transition logic.
//!
//! This module implements the handler that turns user requests and fetch
//! outcomes into context transitions and follow-up actions.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//!
//! ```text
//! Event → handle_event → DataContext transition → Actions
//!   ↑                                                │
//!   └──────── Loaded / LoadFailed (fetch outcome) ───┘
//! ```
//!
//! Refreshes are on demand only. [`Event::RefreshDue`] is how a caller asks for
//! everything past its refresh policy; there is no timer behind it.
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{handle_event, Action, ContextKind, Dashboard, Event, Payload};
//!
//! let mut dashboard = Dashboard::new(Default::default(), Default::default());
//!
//! let (changed, actions) = handle_event(&mut dashboard, &Event::Refresh(ContextKind::Users))?;
//! assert!(changed);
//! assert_eq!(actions, vec![Action::Fetch(ContextKind::Users)]);
//!
//! handle_event(&mut dashboard, &Event::Loaded(Payload::Users(vec![])))?;
//! assert!(!dashboard.users.view().loading);
//! # Ok::<(), servicedesk_state::DeskError>(())
//! ```

use crate::app::{Action, ContextKind, Dashboard, Payload};
use crate::domain::error::Result;
use crate::domain::Staleness;
use chrono::{DateTime, Utc};

/// Requests and fetch outcomes processed by [`handle_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Fetches one context.
    Refresh(ContextKind),

    /// The user asked for fresh data everywhere.
    ///
    /// Loaded contexts are marked stale with [`Staleness::UserRequested`]
    /// before every context is fetched.
    RefreshAll,

    /// Fetches every context whose data needs a refresh as of `now`.
    RefreshDue {
        /// Time to evaluate the refresh policy at.
        now: DateTime<Utc>,
    },

    /// A fetch succeeded.
    Loaded(Payload),

    /// A fetch failed.
    LoadFailed {
        /// Context the fetch was for.
        kind: ContextKind,
        /// Failure text shown next to the last known data.
        message: String,
    },

    /// A context's data is known to be outdated.
    Invalidate(ContextKind),

    /// The user read a notification.
    NotificationRead {
        /// Notification id.
        id: u64,
    },
}

/// Processes an event, applies context transitions and returns actions to execute.
///
/// # Returns
///
/// Whether any view-visible state changed, and the actions to run in order.
///
/// # Errors
///
/// Fetch and validation failures are absorbed into the affected context and do
/// not surface here. The `Result` is reserved for failures of the handler
/// itself.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
pub fn handle_event(dashboard: &mut Dashboard, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::Refresh(kind) => Ok((true, vec![start_fetch(dashboard, *kind)])),
        Event::RefreshAll => {
            let actions = ContextKind::ALL
                .into_iter()
                .map(|kind| {
                    dashboard.context_mut(kind).invalidate(Staleness::UserRequested);
                    start_fetch(dashboard, kind)
                })
                .collect();
            Ok((true, actions))
        }
        Event::RefreshDue { now } => {
            dashboard.expire_at(*now);
            let due = dashboard.due_contexts_at(*now);
            tracing::debug!(due = due.len(), "evaluated refresh policy");

            if due.is_empty() {
                return Ok((false, vec![]));
            }

            let actions = due
                .into_iter()
                .map(|kind| start_fetch(dashboard, kind))
                .collect();
            Ok((true, actions))
        }
        Event::Loaded(payload) => {
            let kind = payload.kind();
            match dashboard.apply_payload_at(payload.clone(), Utc::now()) {
                Ok(()) => {
                    let actions = if dashboard.persist_snapshots {
                        vec![Action::SaveSnapshot(kind)]
                    } else {
                        vec![]
                    };
                    Ok((true, actions))
                }
                Err(e) => {
                    tracing::warn!(context = %kind, error = %e, "rejected fetched payload");
                    Ok((true, vec![]))
                }
            }
        }
        Event::LoadFailed { kind, message } => {
            dashboard.context_mut(*kind).fail(message);
            Ok((true, vec![]))
        }
        Event::Invalidate(kind) => {
            let changed = dashboard.context_mut(*kind).invalidate(Staleness::Invalidated);
            Ok((changed, vec![]))
        }
        Event::NotificationRead { id } => {
            let changed = dashboard.mark_notification_read(*id);
            let actions = if changed && dashboard.persist_snapshots {
                vec![Action::SaveSnapshot(ContextKind::Notifications)]
            } else {
                vec![]
            };
            Ok((changed, actions))
        }
    }
}

fn start_fetch(dashboard: &mut Dashboard, kind: ContextKind) -> Action {
    dashboard.context_mut(kind).begin_refresh();
    Action::Fetch(kind)
}

// Payloads can be large; spans only record the event name.
const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Refresh(_) => "refresh",
        Event::RefreshAll => "refresh_all",
        Event::RefreshDue { .. } => "refresh_due",
        Event::Loaded(_) => "loaded",
        Event::LoadFailed { .. } => "load_failed",
        Event::Invalidate(_) => "invalidate",
        Event::NotificationRead { .. } => "notification_read",
    }
}
