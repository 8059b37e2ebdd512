//! Lifecycle shape for asynchronously loaded values.
//!
//! [`AsyncState`] wraps a domain collection or entity together with its load
//! bookkeeping: whether a fetch is in flight, the last failure message, when the
//! value was last loaded, and whether it is known to be outdated.
//!
//! # State Machine
//!
//! ```text
//!            loading()           succeeded(data)
//!   Empty ─────────────→ Loading ───────────────→ Success
//!                         ↑  │                       │
//!                         │  │ failed(msg)           │ loading()
//!                         │  ↓                       │
//!                         └─ Error ←─────────────────┘
//! ```
//!
//! `Loading` is reachable from every phase. There is no terminal phase. Every
//! transition consumes the current value and returns the next one, so a state is
//! only ever changed by the owner that holds it.
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::AsyncState;
//!
//! let state = AsyncState::empty(Vec::<u32>::new());
//! let state = state.loading();
//! assert!(state.loading);
//!
//! let state = state.succeeded(vec![1]);
//! assert_eq!(state.data, vec![1]);
//! assert!(state.error.is_none());
//!
//! let state = state.loading().failed("network down");
//! assert_eq!(state.data, vec![1]);
//! assert_eq!(state.error.as_deref(), Some("network down"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reason a loaded value was marked stale.
///
/// Informational only: every reason makes [`AsyncState::needs_refresh`] true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Staleness {
    /// The value outlived its refresh policy.
    Expired,
    /// Something outside the context announced the value is outdated.
    Invalidated,
    /// The user asked for fresh data.
    UserRequested,
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Expired => "expired",
            Self::Invalidated => "invalidated",
            Self::UserRequested => "user-requested",
        };
        f.write_str(label)
    }
}

/// Lifecycle phase derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Never loaded and nothing in flight.
    Empty,
    /// A fetch or mutation is in flight.
    Loading,
    /// The last resolved operation succeeded.
    Success,
    /// The last resolved operation failed.
    Error,
}

/// An asynchronously loaded value and its load bookkeeping.
///
/// `data` always holds the best-known value. Failures record a message but keep
/// the previous data so views can keep showing it.
///
/// # Invariants
///
/// - `error.is_some()` implies `!loading`
/// - `stale` is only set when `last_fetch.is_some()`
/// - `staleness.is_some()` exactly when `stale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncState<T> {
    /// Last known value. Starts as the seed given to [`AsyncState::empty`].
    pub data: T,

    /// True while a fetch or mutation is in flight.
    pub loading: bool,

    /// Message of the last failure, cleared by the next load or success.
    pub error: Option<String>,

    /// Time of the last successful load, `None` if never loaded.
    pub last_fetch: Option<DateTime<Utc>>,

    /// True when `data` is known to be outdated.
    pub stale: bool,

    /// Why `stale` became true.
    pub staleness: Option<Staleness>,
}

impl<T> AsyncState<T> {
    /// Creates a never-loaded state holding `seed`.
    ///
    /// The seed is the zero value consumers render before the first load, so
    /// they never have to branch on a missing value.
    #[must_use]
    pub const fn empty(seed: T) -> Self {
        Self {
            data: seed,
            loading: false,
            error: None,
            last_fetch: None,
            stale: false,
            staleness: None,
        }
    }

    /// Marks a fetch as in flight.
    ///
    /// Keeps `data`, `last_fetch` and staleness, and clears any previous error.
    /// Applying it to a state that is already loading yields the same shape.
    #[must_use]
    pub fn loading(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    /// Replaces the data with a freshly loaded value stamped with the current time.
    #[must_use]
    pub fn succeeded(self, data: T) -> Self {
        self.succeeded_at(data, Utc::now())
    }

    /// Replaces the data with a freshly loaded value loaded at `now`.
    ///
    /// Clears the error and any staleness.
    #[must_use]
    pub fn succeeded_at(self, data: T, now: DateTime<Utc>) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            last_fetch: Some(now),
            stale: false,
            staleness: None,
        }
    }

    /// Records a failed operation.
    ///
    /// The previous `data`, `last_fetch` and staleness are kept.
    #[must_use]
    pub fn failed(self, message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            ..self
        }
    }

    /// Marks loaded data as outdated.
    ///
    /// A state that was never loaded is returned unchanged: it already needs a
    /// refresh and has no data to be stale about.
    #[must_use]
    pub fn invalidated(self, reason: Staleness) -> Self {
        if self.last_fetch.is_none() {
            return self;
        }
        Self {
            stale: true,
            staleness: Some(reason),
            ..self
        }
    }

    /// Marks loaded data stale with [`Staleness::Expired`] once it is older than `max_age`.
    ///
    /// Data that is already stale keeps its original reason.
    #[must_use]
    pub fn expire_at(self, max_age: Duration, now: DateTime<Utc>) -> Self {
        if self.stale || !self.is_older_than(max_age, now) {
            return self;
        }
        self.invalidated(Staleness::Expired)
    }

    /// Returns true if the data should be fetched again.
    ///
    /// See [`AsyncState::needs_refresh_at`].
    #[must_use]
    pub fn needs_refresh(&self, max_age: Duration) -> bool {
        self.needs_refresh_at(max_age, Utc::now())
    }

    /// Returns true if the data should be fetched again as of `now`.
    ///
    /// That is the case when it was never loaded, when the last load is older
    /// than `max_age`, or when it has been marked stale.
    #[must_use]
    pub fn needs_refresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.last_fetch.is_none() || self.stale || self.is_older_than(max_age, now)
    }

    /// Lifecycle phase of this state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.last_fetch.is_some() {
            Phase::Success
        } else {
            Phase::Empty
        }
    }

    /// Age of the data as of `now`, `None` if never loaded.
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.last_fetch.map(|fetched| now.signed_duration_since(fetched))
    }

    fn is_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let Some(age) = self.age_at(now) else {
            return false;
        };
        // A max age beyond chrono's range never elapses.
        chrono::Duration::from_std(max_age).is_ok_and(|limit| age > limit)
    }
}

impl<T: Default> Default for AsyncState<T> {
    fn default() -> Self {
        Self::empty(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Row {
        id: u32,
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn empty_holds_seed_with_default_flags() {
        let state = AsyncState::empty(vec![Row { id: 7 }]);
        assert_eq!(state.data, vec![Row { id: 7 }]);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.last_fetch.is_none());
        assert!(!state.stale);
        assert!(state.staleness.is_none());
        assert_eq!(state.phase(), Phase::Empty);
    }

    #[test]
    fn default_uses_zero_value() {
        let state: AsyncState<Vec<Row>> = AsyncState::default();
        assert!(state.data.is_empty());
        assert_eq!(state.phase(), Phase::Empty);
    }

    #[test]
    fn loading_keeps_data_and_clears_error() {
        let state = AsyncState::empty(vec![Row { id: 1 }])
            .loading()
            .failed("boom")
            .loading();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.data, vec![Row { id: 1 }]);
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let once = AsyncState::empty(vec![Row { id: 3 }]).succeeded_at(vec![Row { id: 4 }], at(0)).loading();
        let twice = once.clone().loading();
        assert_eq!(once, twice);
    }

    #[test]
    fn loading_keeps_fetch_time_and_staleness() {
        let state = AsyncState::empty(0u32)
            .succeeded_at(5, at(0))
            .invalidated(Staleness::UserRequested)
            .loading();
        assert_eq!(state.last_fetch, Some(at(0)));
        assert!(state.stale);
        assert_eq!(state.staleness, Some(Staleness::UserRequested));
    }

    #[test]
    fn success_resets_error_and_staleness() {
        let state = AsyncState::empty(Vec::<Row>::new())
            .succeeded_at(vec![Row { id: 1 }], at(0))
            .invalidated(Staleness::Invalidated)
            .loading()
            .failed("timeout")
            .loading()
            .succeeded_at(vec![Row { id: 2 }], at(30));
        assert_eq!(state.data, vec![Row { id: 2 }]);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.stale);
        assert!(state.staleness.is_none());
        assert_eq!(state.last_fetch, Some(at(30)));
        assert_eq!(state.phase(), Phase::Success);
    }

    #[test]
    fn succeeded_stamps_current_time() {
        let before = Utc::now();
        let state = AsyncState::empty(0u8).loading().succeeded(1);
        let fetched = state.last_fetch.unwrap();
        assert!(fetched >= before);
    }

    #[test]
    fn failure_keeps_data_and_staleness() {
        let state = AsyncState::empty(Vec::<Row>::new())
            .succeeded_at(vec![Row { id: 1 }], at(0))
            .invalidated(Staleness::Expired)
            .loading()
            .failed(String::from("network down"));
        assert_eq!(state.data, vec![Row { id: 1 }]);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network down"));
        assert!(state.stale);
        assert_eq!(state.staleness, Some(Staleness::Expired));
        assert_eq!(state.phase(), Phase::Error);
    }

    #[test]
    fn failure_before_first_load_is_error_phase() {
        let state = AsyncState::empty(0u8).loading().failed("refused");
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.last_fetch.is_none());
    }

    #[test]
    fn empty_state_needs_refresh() {
        let state = AsyncState::empty(Vec::<Row>::new());
        assert!(state.needs_refresh_at(Duration::from_secs(3600), at(0)));
        assert!(state.needs_refresh(Duration::MAX));
    }

    #[test]
    fn fresh_success_does_not_need_refresh() {
        let state = AsyncState::empty(0u8).loading().succeeded_at(1, at(0));
        assert!(!state.needs_refresh_at(MINUTE, at(59)));
        assert!(!state.needs_refresh_at(MINUTE, at(60)));
        assert!(state.needs_refresh_at(MINUTE, at(61)));
    }

    #[test]
    fn stale_success_needs_refresh() {
        let state = AsyncState::empty(0u8)
            .succeeded_at(1, at(0))
            .invalidated(Staleness::Invalidated);
        assert!(state.needs_refresh_at(MINUTE, at(1)));
    }

    #[test]
    fn unbounded_max_age_never_expires() {
        let state = AsyncState::empty(0u8).succeeded_at(1, at(0));
        assert!(!state.needs_refresh_at(Duration::MAX, at(1_000_000)));
    }

    #[test]
    fn invalidating_unloaded_state_is_noop() {
        let state = AsyncState::empty(0u8).invalidated(Staleness::UserRequested);
        assert_eq!(state, AsyncState::empty(0u8));
    }

    #[test]
    fn expire_marks_only_old_data() {
        let fresh = AsyncState::empty(0u8).succeeded_at(1, at(0));
        assert!(!fresh.clone().expire_at(MINUTE, at(30)).stale);

        let expired = fresh.expire_at(MINUTE, at(90));
        assert!(expired.stale);
        assert_eq!(expired.staleness, Some(Staleness::Expired));
    }

    #[test]
    fn expire_keeps_existing_reason() {
        let state = AsyncState::empty(0u8)
            .succeeded_at(1, at(0))
            .invalidated(Staleness::UserRequested)
            .expire_at(MINUTE, at(600));
        assert_eq!(state.staleness, Some(Staleness::UserRequested));
    }

    #[test]
    fn lifecycle_scenario_success_then_error() {
        let state = AsyncState::empty(Vec::<Row>::new());
        let state = state.loading();
        let state = state.succeeded(vec![Row { id: 1 }]);
        assert_eq!(state.data, vec![Row { id: 1 }]);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.stale);

        let state = state.failed("network down");
        assert_eq!(state.data, vec![Row { id: 1 }]);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network down"));
    }

    #[test]
    fn serializes_staleness_in_kebab_case() {
        let state = AsyncState::empty(1u8)
            .succeeded_at(2, at(0))
            .invalidated(Staleness::UserRequested);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["staleness"], "user-requested");
        assert_eq!(json["data"], 2);
    }
}
