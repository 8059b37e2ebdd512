//! Lifecycle properties of `AsyncState` through the public API.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use servicedesk_state::{AsyncState, Phase, Staleness};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Row {
    id: u64,
}

#[test]
fn empty_loading_success_scenario() {
    let state = AsyncState::empty(Vec::<Row>::new())
        .loading()
        .succeeded(vec![Row { id: 1 }]);

    assert_eq!(state.data, vec![Row { id: 1 }]);
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(!state.stale);
    assert!(state.last_fetch.is_some());
    assert_eq!(state.phase(), Phase::Success);
}

#[test]
fn failure_after_success_keeps_data() {
    let state = AsyncState::empty(Vec::<Row>::new())
        .loading()
        .succeeded(vec![Row { id: 1 }])
        .loading()
        .failed("network down");

    assert_eq!(state.data, vec![Row { id: 1 }]);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("network down"));
    assert_eq!(state.phase(), Phase::Error);
}

#[test]
fn loading_twice_matches_loading_once() {
    let once = AsyncState::empty(vec![Row { id: 3 }]).loading();
    let twice = once.clone().loading();
    assert_eq!(once, twice);
    assert_eq!(twice.data, vec![Row { id: 3 }]);
}

#[test]
fn refresh_decisions_follow_age() {
    let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single().unwrap();
    let max_age = Duration::from_secs(60);

    let empty = AsyncState::empty(Vec::<Row>::new());
    assert!(empty.needs_refresh_at(max_age, fetched));

    let loaded = empty.loading().succeeded_at(vec![Row { id: 1 }], fetched);
    assert!(!loaded.needs_refresh_at(max_age, fetched + ChronoDuration::seconds(60)));
    assert!(loaded.needs_refresh_at(max_age, fetched + ChronoDuration::seconds(61)));

    let stale = loaded.invalidated(Staleness::Invalidated);
    assert!(stale.needs_refresh_at(max_age, fetched));
    assert_eq!(stale.phase(), Phase::Success);
}

#[test]
fn expiry_marks_stale_without_dropping_data() {
    let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single().unwrap();
    let state = AsyncState::empty(Vec::<Row>::new())
        .succeeded_at(vec![Row { id: 9 }], fetched)
        .expire_at(Duration::from_secs(30), fetched + ChronoDuration::minutes(5));

    assert!(state.stale);
    assert_eq!(state.staleness, Some(Staleness::Expired));
    assert_eq!(state.data, vec![Row { id: 9 }]);
}
