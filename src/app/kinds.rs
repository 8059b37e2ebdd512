//! Context identifiers and fetch payloads.
//!
//! Every dashboard domain is named by a [`ContextKind`]. A successful fetch for
//! a domain produces the matching [`Payload`] variant, which the handler routes
//! to that domain's context.
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{ContextKind, Payload};
//!
//! let payload = Payload::Users(vec![]);
//! assert_eq!(payload.kind(), ContextKind::Users);
//! assert_eq!(ContextKind::SmartQueue.to_string(), "smart-queue");
//! ```

use crate::domain::{Notification, PulseMetric, QueueEntry, User, WorkItem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dashboard domain owning one data context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextKind {
    Incidents,
    ServiceRequests,
    Notifications,
    SmartQueue,
    PulseMetrics,
    Users,
}

impl ContextKind {
    /// Every kind, in dashboard display order.
    pub const ALL: [Self; 6] = [
        Self::Incidents,
        Self::ServiceRequests,
        Self::Notifications,
        Self::SmartQueue,
        Self::PulseMetrics,
        Self::Users,
    ];

    /// Stable kebab-case name, used for file names and configuration keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::ServiceRequests => "service-requests",
            Self::Notifications => "notifications",
            Self::SmartQueue => "smart-queue",
            Self::PulseMetrics => "pulse-metrics",
            Self::Users => "users",
        }
    }

    /// Parses a kebab-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshly fetched data for one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum Payload {
    Incidents(Vec<WorkItem>),
    ServiceRequests(Vec<WorkItem>),
    Notifications(Vec<Notification>),
    SmartQueue(Vec<QueueEntry>),
    PulseMetrics(Vec<PulseMetric>),
    Users(Vec<User>),
}

impl Payload {
    /// The context this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> ContextKind {
        match self {
            Self::Incidents(_) => ContextKind::Incidents,
            Self::ServiceRequests(_) => ContextKind::ServiceRequests,
            Self::Notifications(_) => ContextKind::Notifications,
            Self::SmartQueue(_) => ContextKind::SmartQueue,
            Self::PulseMetrics(_) => ContextKind::PulseMetrics,
            Self::Users(_) => ContextKind::Users,
        }
    }

    /// Number of records carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Incidents(items) | Self::ServiceRequests(items) => items.len(),
            Self::Notifications(items) => items.len(),
            Self::SmartQueue(items) => items.len(),
            Self::PulseMetrics(items) => items.len(),
            Self::Users(items) => items.len(),
        }
    }

    /// Returns true if the payload carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ContextKind::ALL {
            assert_eq!(ContextKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ContextKind::from_name("tickets"), None);
    }

    #[test]
    fn serde_name_matches_display() {
        let json = serde_json::to_string(&ContextKind::PulseMetrics).unwrap();
        assert_eq!(json, "\"pulse-metrics\"");
    }

    #[test]
    fn payload_reports_kind_and_len() {
        let payload = Payload::ServiceRequests(vec![]);
        assert_eq!(payload.kind(), ContextKind::ServiceRequests);
        assert!(payload.is_empty());
    }
}
