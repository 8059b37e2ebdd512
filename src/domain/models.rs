//! Dashboard domain records.
//!
//! These are the values the data contexts hold. They mirror the records the
//! service desk backend serves: work items (incidents, service requests,
//! problems), smart-queue rows, notifications, pulse metrics and users.

use crate::domain::schema::{Priority, SlaKey, WorkStatus, WorkType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// An incident, service request or problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub work_type: WorkType,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// SLA target in minutes. Filled from the schema on load when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_target_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    /// Creates a new work item with status `new`, no priority and no SLA target.
    ///
    /// # Examples
    ///
    /// ```
    /// use servicedesk_state::domain::{WorkItem, WorkStatus, WorkType};
    ///
    /// let item = WorkItem::new(1, "VPN down", WorkType::Incident);
    /// assert_eq!(item.status, WorkStatus::New);
    /// assert_eq!(item.sla_target_minutes, None);
    /// ```
    pub fn new(id: u64, title: impl Into<String>, work_type: WorkType) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            work_type,
            status: WorkStatus::New,
            priority: None,
            sla_target_minutes: None,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    /// Key used to look up this item's SLA target in the schema.
    ///
    /// Items without a priority use the `standard` target.
    #[must_use]
    pub fn sla_key(&self) -> SlaKey {
        self.priority.map_or(SlaKey::Standard, Priority::sla_key)
    }

    /// Time left until the SLA target as of `now`; negative once breached.
    ///
    /// `None` when the item has no SLA target.
    #[must_use]
    pub fn sla_remaining_at(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let target = chrono::Duration::minutes(i64::from(self.sla_target_minutes?));
        Some(target - now.signed_duration_since(self.created_at))
    }
}

/// A ranked row of the smart triage queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub work_item: WorkItem,
    /// Triage score; higher is more urgent. Computed on load when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// One sample of a pulse metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseMetric {
    pub name: String,
    pub metric_type: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// A service desk user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub team: Option<String>,
}

/// Returns a human-readable string describing how long ago `then` was.
///
/// The format varies based on the time elapsed:
/// - Less than 1 minute: "just now"
/// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
/// - Less than 1 day: "Xh ago" (e.g., "3h ago")
/// - 1 day or more: "Xd ago" (e.g., "7d ago")
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use servicedesk_state::domain::models::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now, now), "just now");
/// assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
/// ```
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn work_item_defaults_when_fields_missing() {
        let item: WorkItem = serde_json::from_str(
            r#"{"id": 9, "title": "Printer jam", "work_type": "request", "created_at": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.status, WorkStatus::New);
        assert_eq!(item.priority, None);
        assert_eq!(item.sla_target_minutes, None);
        assert_eq!(item.sla_key(), SlaKey::Standard);
        assert!(item.description.is_empty());
    }

    #[test]
    fn work_item_parses_wire_enums() {
        let item: WorkItem = serde_json::from_str(
            r#"{"id": 1, "title": "DB latency", "work_type": "incident", "status": "in_progress",
                "priority": "priority_1", "sla_target_minutes": 60, "created_at": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.status, WorkStatus::InProgress);
        assert_eq!(item.priority, Some(Priority::Priority1));
        assert_eq!(item.sla_key(), SlaKey::Priority1);
        assert_eq!(item.sla_target_minutes, Some(60));
    }

    #[test]
    fn sla_remaining_goes_negative_after_breach() {
        let mut item = WorkItem::new(1, "Outage", WorkType::Incident);
        let created = item.created_at;
        assert_eq!(item.sla_remaining_at(created), None);

        item.sla_target_minutes = Some(30);
        assert_eq!(
            item.sla_remaining_at(created + Duration::minutes(10)),
            Some(Duration::minutes(20))
        );
        assert!(item.sla_remaining_at(created + Duration::minutes(45)) < Some(Duration::zero()));
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(59), now), "just now");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(7), now), "7d ago");
    }
}
