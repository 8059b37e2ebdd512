//! Action processor binding the dashboard to a data source and snapshot store.
//!
//! [`Runtime`] executes the actions returned by [`handle_event`] until none are
//! left: fetches run synchronously against the [`DataSource`] and re-enter the
//! handler as outcome events, and snapshot saves go to the optional
//! [`SnapshotStore`].
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{ContextKind, Dashboard, Payload};
//! use servicedesk_state::{Event, Runtime};
//!
//! let source = |_kind: ContextKind| Ok::<_, servicedesk_state::DeskError>(Payload::Users(vec![]));
//! let mut runtime = Runtime::new(Dashboard::new(Default::default(), Default::default()), source);
//!
//! runtime.dispatch(Event::Refresh(ContextKind::Users))?;
//! assert!(runtime.dashboard().users.state().last_fetch.is_some());
//! # Ok::<(), servicedesk_state::DeskError>(())
//! ```

use crate::app::{handle_event, Action, ContextKind, Dashboard, Event};
use crate::domain::error::Result;
use crate::source::{outcome_event, DataSource};
use crate::storage::SnapshotStore;
use std::collections::VecDeque;

/// Owns a dashboard session together with its side-effect backends.
pub struct Runtime<S> {
    dashboard: Dashboard,
    source: S,
    store: Option<Box<dyn SnapshotStore>>,
}

impl<S: DataSource> Runtime<S> {
    /// Creates a runtime without snapshot persistence.
    #[must_use]
    pub const fn new(dashboard: Dashboard, source: S) -> Self {
        Self {
            dashboard,
            source,
            store: None,
        }
    }

    /// Attaches a snapshot store and restores every context it holds.
    ///
    /// Snapshots that do not decode are removed from the store and the
    /// context stays empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Result<Self> {
        self.store = Some(store);
        self.restore_snapshots()?;
        Ok(self)
    }

    /// The dashboard session.
    #[must_use]
    pub const fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Mutable access to the dashboard session.
    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    /// Handles an event and runs every resulting action to completion.
    ///
    /// Returns whether any view-visible state changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler fails, or the first snapshot write
    /// error once every queued event has been handled. Fetch failures never
    /// surface here; they end up in the context.
    pub fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut pending = VecDeque::from([event]);
        let mut changed = false;
        let mut save_error = None;

        while let Some(event) = pending.pop_front() {
            let (event_changed, actions) = handle_event(&mut self.dashboard, &event)?;
            changed |= event_changed;

            for action in actions {
                match action {
                    Action::Fetch(kind) => {
                        let outcome = self.source.fetch(kind);
                        pending.push_back(outcome_event(kind, outcome));
                    }
                    Action::SaveSnapshot(kind) => {
                        if let Err(e) = self.save_snapshot(kind) {
                            tracing::warn!(context = %kind, error = %e, "snapshot save failed");
                            if save_error.is_none() {
                                save_error = Some(e);
                            }
                        }
                    }
                }
            }
        }

        save_error.map_or(Ok(changed), Err)
    }

    fn save_snapshot(&mut self, kind: ContextKind) -> Result<()> {
        let Some(store) = self.store.as_mut() else {
            tracing::debug!(context = %kind, "no snapshot store attached, skipping save");
            return Ok(());
        };
        let state = self.dashboard.snapshot_state(kind)?;
        store.save_snapshot(kind, state)
    }

    fn restore_snapshots(&mut self) -> Result<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };

        for (kind, record) in store.load_all()? {
            if let Err(e) = self.dashboard.restore_state(kind, record.state) {
                tracing::warn!(context = %kind, error = %e, "discarding unreadable snapshot");
                store.remove_snapshot(kind)?;
            }
        }
        Ok(())
    }
}

impl<S> std::fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("dashboard", &self.dashboard)
            .field("has_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Payload;
    use crate::domain::{DeskError, Phase, Staleness, User};
    use crate::storage::{JsonSnapshotStore, SnapshotRecord};

    struct FullDisk;

    impl SnapshotStore for FullDisk {
        fn save_snapshot(&mut self, _kind: ContextKind, _state: serde_json::Value) -> Result<()> {
            Err(DeskError::Storage("disk full".to_string()))
        }

        fn load_snapshot(&self, _kind: ContextKind) -> Result<Option<SnapshotRecord>> {
            Ok(None)
        }

        fn load_all(&self) -> Result<Vec<(ContextKind, SnapshotRecord)>> {
            Ok(vec![])
        }

        fn remove_snapshot(&mut self, _kind: ContextKind) -> Result<bool> {
            Ok(false)
        }
    }

    fn empty_payload(kind: ContextKind) -> Result<Payload> {
        Ok(match kind {
            ContextKind::Incidents => Payload::Incidents(vec![]),
            ContextKind::ServiceRequests => Payload::ServiceRequests(vec![]),
            ContextKind::Notifications => Payload::Notifications(vec![]),
            ContextKind::SmartQueue => Payload::SmartQueue(vec![]),
            ContextKind::PulseMetrics => Payload::PulseMetrics(vec![]),
            ContextKind::Users => Payload::Users(vec![user(1)]),
        })
    }

    fn user(id: u64) -> User {
        User {
            id,
            display_name: format!("user {id}"),
            role: "agent".to_string(),
            team: None,
        }
    }

    fn users_only(kind: ContextKind) -> Result<Payload> {
        match kind {
            ContextKind::Users => Ok(Payload::Users(vec![user(1)])),
            other => Err(DeskError::Source(format!("{other} unavailable"))),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(Default::default(), Default::default())
    }

    #[test]
    fn dispatch_runs_fetches_to_completion() {
        let mut runtime = Runtime::new(dashboard(), users_only);
        assert!(runtime.dispatch(Event::RefreshAll).unwrap());

        let dashboard = runtime.dashboard();
        assert_eq!(dashboard.users.view().data, &vec![user(1)]);
        assert!(!dashboard.users.view().loading);
        assert_eq!(
            dashboard.incidents.view().error,
            Some("Source error: incidents unavailable")
        );
        assert!(!dashboard.incidents.view().loading);
    }

    #[test]
    fn snapshots_are_saved_and_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");

        let mut first = dashboard();
        first.persist_snapshots = true;
        let mut runtime = Runtime::new(first, users_only)
            .with_store(Box::new(JsonSnapshotStore::new(path.clone()).unwrap()))
            .unwrap();
        runtime.dispatch(Event::Refresh(ContextKind::Users)).unwrap();
        let saved = runtime.dashboard().users.state().clone();

        let offline = |_kind: ContextKind| -> Result<Payload> {
            Err(DeskError::Source("offline".to_string()))
        };
        let mut runtime = Runtime::new(dashboard(), offline)
            .with_store(Box::new(JsonSnapshotStore::new(path).unwrap()))
            .unwrap();
        assert_eq!(runtime.dashboard().users.state(), &saved);

        runtime.dispatch(Event::Refresh(ContextKind::Users)).unwrap();
        let view = runtime.dashboard().users.view();
        assert_eq!(view.data, &vec![user(1)]);
        assert_eq!(view.error, Some("Source error: offline"));
    }

    #[test]
    fn failed_saves_do_not_strand_other_loads() {
        let mut persisting = dashboard();
        persisting.persist_snapshots = true;
        let mut runtime = Runtime::new(persisting, empty_payload)
            .with_store(Box::new(FullDisk))
            .unwrap();

        let err = runtime.dispatch(Event::RefreshAll).unwrap_err();
        assert_eq!(err.to_string(), "Storage error: disk full");

        let dashboard = runtime.dashboard();
        for kind in ContextKind::ALL {
            let summary = dashboard.context(kind).summary();
            assert!(!summary.loading, "{kind} left loading");
            assert_eq!(summary.phase, Phase::Success, "{kind} not loaded");
        }
        assert_eq!(dashboard.users.view().data, &vec![user(1)]);
    }

    #[test]
    fn unreadable_snapshots_are_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");
        let mut store = JsonSnapshotStore::new(path.clone()).unwrap();
        store
            .save_snapshot(ContextKind::Users, serde_json::json!({"data": "nope"}))
            .unwrap();

        let runtime = Runtime::new(dashboard(), users_only)
            .with_store(Box::new(store))
            .unwrap();
        assert!(runtime.dashboard().users.state().last_fetch.is_none());

        let reopened = JsonSnapshotStore::new(path).unwrap();
        assert!(reopened.load_snapshot(ContextKind::Users).unwrap().is_none());
    }

    #[test]
    fn invalidate_then_refresh_due_refetches() {
        let mut runtime = Runtime::new(dashboard(), users_only);
        runtime.dispatch(Event::Refresh(ContextKind::Users)).unwrap();
        runtime.dispatch(Event::Invalidate(ContextKind::Users)).unwrap();
        assert_eq!(
            runtime.dashboard().users.state().staleness,
            Some(Staleness::Invalidated)
        );

        runtime
            .dispatch(Event::RefreshDue { now: chrono::Utc::now() })
            .unwrap();
        assert!(!runtime.dashboard().users.state().stale);
    }
}
