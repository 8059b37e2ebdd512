//! Per-domain data contexts.
//!
//! A [`DataContext`] is the single owner of one domain's [`AsyncState`]. It is
//! created empty when the dashboard session starts and is only changed through
//! its transition methods, which apply the pure [`AsyncState`] transitions in
//! place.
//!
//! Views read the context through [`DataContext::view`], which exposes the
//! `{data, loading, error, stale}` tuple a component renders. Code that does not
//! care about the record type goes through the object-safe [`ContextStatus`]
//! trait.
//!
//! # Concurrency
//!
//! A context does not sequence overlapping loads. If a second refresh starts
//! before the first resolves, both resolve independently and the last one wins.
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{ContextKind, DataContext};
//!
//! let mut users = DataContext::new(ContextKind::Users, Vec::<String>::new());
//! users.refresh_with(|| Ok::<_, String>(vec!["ada".to_string()]));
//!
//! let view = users.view();
//! assert_eq!(view.data, &vec!["ada".to_string()]);
//! assert!(!view.loading);
//! assert!(view.error.is_none());
//! ```

use super::kinds::ContextKind;
use crate::domain::{AsyncState, Phase, Staleness};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// What a view component reads from a context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextView<'a, T> {
    pub data: &'a T,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub stale: bool,
}

/// Type-erased status of a context, used for listings and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub kind: ContextKind,
    pub phase: Phase,
    pub items: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub stale: bool,
    pub staleness: Option<Staleness>,
    pub last_fetch: Option<DateTime<Utc>>,
}

/// Owner of one domain's async state.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext<T> {
    kind: ContextKind,
    state: AsyncState<T>,
}

impl<T> DataContext<T> {
    /// Creates a context holding an empty state seeded with `seed`.
    #[must_use]
    pub const fn new(kind: ContextKind, seed: T) -> Self {
        Self {
            kind,
            state: AsyncState::empty(seed),
        }
    }

    /// The domain this context belongs to.
    #[must_use]
    pub const fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AsyncState<T> {
        &self.state
    }

    /// The tuple a view renders.
    #[must_use]
    pub fn view(&self) -> ContextView<'_, T> {
        ContextView {
            data: &self.state.data,
            loading: self.state.loading,
            error: self.state.error.as_deref(),
            stale: self.state.stale,
        }
    }

    /// Returns true if the context should be fetched again as of `now`.
    #[must_use]
    pub fn needs_refresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.state.needs_refresh_at(max_age, now)
    }
}

impl<T: Default> DataContext<T> {
    /// Marks a load as in flight.
    ///
    /// Returns true if a load was already in flight. The new load is started
    /// anyway; whichever resolves last determines the final state.
    pub fn begin_refresh(&mut self) -> bool {
        let overlapping = self.state.loading;
        if overlapping {
            tracing::debug!(context = %self.kind, "refresh started while a load is in flight");
        }
        self.apply(AsyncState::loading);
        overlapping
    }

    /// Applies the outcome of a load.
    ///
    /// A failure is absorbed: its display text becomes the context's error and
    /// the previous data is kept.
    pub fn resolve<E: fmt::Display>(&mut self, outcome: std::result::Result<T, E>) {
        self.resolve_at(outcome, Utc::now());
    }

    /// Applies the outcome of a load that completed at `now`.
    pub fn resolve_at<E: fmt::Display>(&mut self, outcome: std::result::Result<T, E>, now: DateTime<Utc>) {
        match outcome {
            Ok(data) => {
                self.apply(|state| state.succeeded_at(data, now));
                tracing::debug!(context = %self.kind, "load succeeded");
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(context = %self.kind, error = %message, "load failed");
                self.apply(|state| state.failed(message));
            }
        }
    }

    /// Runs a caller-supplied fetch through a full load cycle.
    pub fn refresh_with<F, E>(&mut self, fetch: F)
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        let _span = tracing::debug_span!("refresh_context", context = %self.kind).entered();
        self.begin_refresh();
        self.resolve(fetch());
    }

    /// Records a failed operation without new data.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(context = %self.kind, error = %message, "operation failed");
        self.apply(|state| state.failed(message));
    }

    /// Marks loaded data as outdated.
    ///
    /// Returns false if the context was never loaded and nothing changed.
    pub fn invalidate(&mut self, reason: Staleness) -> bool {
        if self.state.last_fetch.is_none() {
            return false;
        }
        tracing::debug!(context = %self.kind, reason = %reason, "context invalidated");
        self.apply(|state| state.invalidated(reason));
        true
    }

    /// Marks the data expired if it is older than `max_age` as of `now`.
    pub fn expire_at(&mut self, max_age: Duration, now: DateTime<Utc>) {
        self.apply(|state| state.expire_at(max_age, now));
    }

    /// Replaces the state with one persisted by an earlier session.
    ///
    /// A load that was in flight when the snapshot was taken can no longer
    /// resolve, so the restored state is never loading. A snapshot that was
    /// never fetched is never stale, and stale data always carries a reason.
    pub fn restore(&mut self, snapshot: AsyncState<T>) {
        tracing::debug!(
            context = %self.kind,
            last_fetch = ?snapshot.last_fetch,
            "restoring context from snapshot"
        );

        let stale = snapshot.stale && snapshot.last_fetch.is_some();
        let staleness = if stale {
            snapshot.staleness.or(Some(Staleness::Invalidated))
        } else {
            None
        };
        self.state = AsyncState {
            loading: false,
            stale,
            staleness,
            ..snapshot
        };
    }

    /// Replaces the data without touching the load bookkeeping.
    ///
    /// Used for local edits such as marking a notification read.
    pub fn update_data(&mut self, edit: impl FnOnce(&mut T)) {
        edit(&mut self.state.data);
    }

    fn apply(&mut self, transition: impl FnOnce(AsyncState<T>) -> AsyncState<T>) {
        let current = std::mem::take(&mut self.state);
        self.state = transition(current);
    }
}

/// Record-type independent access to a context.
pub trait ContextStatus {
    /// The domain of the context.
    fn kind(&self) -> ContextKind;

    /// Current status for listings.
    fn summary(&self) -> ContextSummary;

    /// See [`DataContext::needs_refresh_at`].
    fn needs_refresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool;

    /// See [`DataContext::begin_refresh`].
    fn begin_refresh(&mut self) -> bool;

    /// See [`DataContext::fail`].
    fn fail(&mut self, message: &str);

    /// See [`DataContext::invalidate`].
    fn invalidate(&mut self, reason: Staleness) -> bool;

    /// See [`DataContext::expire_at`].
    fn expire_at(&mut self, max_age: Duration, now: DateTime<Utc>);
}

impl<R> ContextStatus for DataContext<Vec<R>> {
    fn kind(&self) -> ContextKind {
        self.kind
    }

    fn summary(&self) -> ContextSummary {
        ContextSummary {
            kind: self.kind,
            phase: self.state.phase(),
            items: self.state.data.len(),
            loading: self.state.loading,
            error: self.state.error.clone(),
            stale: self.state.stale,
            staleness: self.state.staleness,
            last_fetch: self.state.last_fetch,
        }
    }

    fn needs_refresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        Self::needs_refresh_at(self, max_age, now)
    }

    fn begin_refresh(&mut self) -> bool {
        Self::begin_refresh(self)
    }

    fn fail(&mut self, message: &str) {
        Self::fail(self, message);
    }

    fn invalidate(&mut self, reason: Staleness) -> bool {
        Self::invalidate(self, reason)
    }

    fn expire_at(&mut self, max_age: Duration, now: DateTime<Utc>) {
        Self::expire_at(self, max_age, now);
    }
}
