//! Smart-queue triage scoring and ranking.
//!
//! A queue entry's score combines the work item's priority with how close it
//! is to breaching its SLA:
//!
//! ```text
//! score = priority weight + SLA urgency
//! ```
//!
//! | Priority   | Weight |   | SLA time left | Urgency |
//! |------------|--------|---|---------------|---------|
//! | priority_1 | 400    |   | breached      | 300     |
//! | priority_2 | 300    |   | ≤ 15 min      | 250     |
//! | priority_3 | 200    |   | ≤ 30 min      | 200     |
//! | priority_4 | 100    |   | ≤ 60 min      | 100     |
//!
//! Items without a priority or an SLA target get nothing for that part.

use crate::domain::models::{QueueEntry, WorkItem};
use crate::domain::schema::Priority;
use chrono::{DateTime, Utc};

/// Urgency bands as (minutes left at most, points), tightest first.
const URGENCY_BANDS: [(i64, u32); 3] = [(15, 250), (30, 200), (60, 100)];

/// Points for an item whose SLA is already breached.
const BREACHED_POINTS: u32 = 300;

const fn priority_weight(priority: Priority) -> u32 {
    match priority {
        Priority::Priority1 => 400,
        Priority::Priority2 => 300,
        Priority::Priority3 => 200,
        Priority::Priority4 => 100,
    }
}

/// Calculates the triage score of a work item as of `now`.
///
/// The SLA clock stops at `modified_at` when the item carries one.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use servicedesk_state::domain::scoring::smart_score;
/// use servicedesk_state::domain::{Priority, WorkItem, WorkType};
///
/// let mut item = WorkItem::new(1, "VPN down", WorkType::Incident);
/// item.priority = Some(Priority::Priority1);
/// item.sla_target_minutes = Some(60);
///
/// // 50 minutes in, 10 left: 400 + 250
/// assert_eq!(smart_score(&item, item.created_at + Duration::minutes(50)), 650);
/// ```
#[must_use]
pub fn smart_score(item: &WorkItem, now: DateTime<Utc>) -> u32 {
    let weight = item.priority.map_or(0, priority_weight);

    let as_of = item.modified_at.unwrap_or(now);
    let urgency = item
        .sla_remaining_at(as_of)
        .map_or(0, |remaining| urgency_points(remaining.num_seconds()));

    weight + urgency
}

fn urgency_points(remaining_secs: i64) -> u32 {
    if remaining_secs <= 0 {
        return BREACHED_POINTS;
    }
    URGENCY_BANDS
        .iter()
        .find(|(minutes, _)| remaining_secs <= minutes * 60)
        .map_or(0, |&(_, points)| points)
}

/// Fills in missing scores, then sorts entries most urgent first.
///
/// Scores supplied with an entry are kept. Ties are broken by the tighter
/// SLA target (items without one last), then by id.
pub fn rank_queue(entries: &mut [QueueEntry], now: DateTime<Utc>) {
    for entry in entries.iter_mut() {
        if entry.score.is_none() {
            entry.score = Some(smart_score(&entry.work_item, now));
        }
    }

    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(sla_order(a).cmp(&sla_order(b)))
            .then(a.work_item.id.cmp(&b.work_item.id))
    });
}

fn sla_order(entry: &QueueEntry) -> u32 {
    entry.work_item.sla_target_minutes.unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkType;
    use chrono::{Duration, TimeZone};

    fn created() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap()
    }

    fn item(id: u64, priority: Option<Priority>, sla: Option<u32>) -> WorkItem {
        let mut item = WorkItem::new(id, format!("item {id}"), WorkType::Incident);
        item.priority = priority;
        item.sla_target_minutes = sla;
        item.created_at = created();
        item
    }

    fn entry(id: u64, score: Option<u32>, sla: Option<u32>) -> QueueEntry {
        QueueEntry {
            work_item: item(id, None, sla),
            score,
        }
    }

    #[test]
    fn priority_weights() {
        let now = created();
        assert_eq!(smart_score(&item(1, Some(Priority::Priority1), None), now), 400);
        assert_eq!(smart_score(&item(2, Some(Priority::Priority2), None), now), 300);
        assert_eq!(smart_score(&item(3, Some(Priority::Priority3), None), now), 200);
        assert_eq!(smart_score(&item(4, Some(Priority::Priority4), None), now), 100);
        assert_eq!(smart_score(&item(5, None, None), now), 0);
    }

    #[test]
    fn sla_urgency_thresholds() {
        let target = item(1, None, Some(120));
        let left = |minutes: i64| created() + Duration::minutes(120 - minutes);

        assert_eq!(smart_score(&target, left(61)), 0);
        assert_eq!(smart_score(&target, left(60)), 100);
        assert_eq!(smart_score(&target, left(31)), 100);
        assert_eq!(smart_score(&target, left(30)), 200);
        assert_eq!(smart_score(&target, left(16)), 200);
        assert_eq!(smart_score(&target, left(15)), 250);
        assert_eq!(smart_score(&target, left(1)), 250);
        assert_eq!(smart_score(&target, left(0)), 300);
        assert_eq!(smart_score(&target, left(-90)), 300);
    }

    #[test]
    fn sla_clock_stops_at_modification() {
        let mut target = item(1, Some(Priority::Priority2), Some(60));
        target.modified_at = Some(created() + Duration::minutes(5));
        assert_eq!(smart_score(&target, created() + Duration::days(3)), 300 + 100);
    }

    #[test]
    fn rank_fills_missing_scores_only() {
        let now = created();
        let mut entries = vec![
            QueueEntry {
                work_item: item(1, Some(Priority::Priority1), Some(60)),
                score: None,
            },
            entry(2, Some(7), Some(60)),
        ];
        rank_queue(&mut entries, now);

        assert_eq!(entries[0].work_item.id, 1);
        assert_eq!(entries[0].score, Some(500));
        assert_eq!(entries[1].score, Some(7));
    }

    #[test]
    fn ties_prefer_tighter_sla_then_id() {
        let mut entries = vec![
            entry(1, Some(200), Some(240)),
            entry(2, Some(400), Some(60)),
            entry(3, Some(200), None),
            entry(4, Some(200), Some(60)),
            entry(5, Some(200), Some(60)),
        ];
        rank_queue(&mut entries, created());

        let ids: Vec<u64> = entries.iter().map(|e| e.work_item.id).collect();
        assert_eq!(ids, vec![2, 4, 5, 1, 3]);
    }
}
