//! View model for the context status report.
//!
//! The view model is computed from a [`Dashboard`] snapshot and contains only
//! display-ready strings: one row per context with its badge (loading, error,
//! stale), record count and data age.

use crate::app::{ContextSummary, Dashboard};
use crate::domain::models::time_ago;
use crate::domain::Phase;
use chrono::{DateTime, Utc};

/// Complete report view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportViewModel {
    pub rows: Vec<StatusRow>,
    /// Unread notification count for the header.
    pub unread_notifications: usize,
}

/// One context line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub label: String,
    pub badge: String,
    pub items: usize,
    pub age: String,
    /// Error banner text, shown below the row.
    pub error: Option<String>,
}

impl ReportViewModel {
    /// Computes the report for `dashboard` as of `now`.
    #[must_use]
    pub fn compute(dashboard: &Dashboard, now: DateTime<Utc>) -> Self {
        let rows = dashboard
            .summaries()
            .iter()
            .map(|summary| StatusRow::from_summary(summary, now))
            .collect();

        Self {
            rows,
            unread_notifications: dashboard.unread_notifications(),
        }
    }
}

impl StatusRow {
    fn from_summary(summary: &ContextSummary, now: DateTime<Utc>) -> Self {
        let badge = match (summary.phase, summary.staleness) {
            (Phase::Loading, _) => "loading".to_string(),
            (Phase::Error, _) => "error".to_string(),
            (Phase::Empty, _) => "empty".to_string(),
            (Phase::Success, Some(reason)) => format!("stale ({reason})"),
            (Phase::Success, None) => "ok".to_string(),
        };

        let age = summary
            .last_fetch
            .map_or_else(|| "never".to_string(), |fetched| time_ago(fetched, now));

        Self {
            label: summary.kind.to_string(),
            badge,
            items: summary.items,
            age,
            error: summary.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ContextKind, Payload};
    use crate::domain::Staleness;

    #[test]
    fn rows_reflect_context_phase() {
        let now = Utc::now();
        let mut dashboard = Dashboard::new(Default::default(), Default::default());
        dashboard.apply_payload_at(Payload::Users(vec![]), now).unwrap();
        dashboard.apply_payload_at(Payload::Notifications(vec![]), now).unwrap();
        dashboard.notifications.invalidate(Staleness::UserRequested);
        dashboard.context_mut(ContextKind::Incidents).begin_refresh();
        dashboard.context_mut(ContextKind::PulseMetrics).fail("metrics offline");

        let vm = ReportViewModel::compute(&dashboard, now);
        let badge = |label: &str| {
            vm.rows
                .iter()
                .find(|row| row.label == label)
                .map(|row| row.badge.clone())
                .unwrap()
        };

        assert_eq!(badge("users"), "ok");
        assert_eq!(badge("notifications"), "stale (user-requested)");
        assert_eq!(badge("incidents"), "loading");
        assert_eq!(badge("pulse-metrics"), "error");
        assert_eq!(badge("smart-queue"), "empty");

        let users = vm.rows.iter().find(|row| row.label == "users").unwrap();
        assert_eq!(users.age, "just now");
        let queue = vm.rows.iter().find(|row| row.label == "smart-queue").unwrap();
        assert_eq!(queue.age, "never");
    }
}
