//! Dashboard session state.
//!
//! [`Dashboard`] owns one [`DataContext`] per domain for the lifetime of an
//! application session. It is built once from configuration and passed
//! explicitly to the event handler and to whatever renders the views.
//!
//! # State Components
//!
//! - **Contexts**: incidents, service requests, notifications, smart queue,
//!   pulse metrics, users
//! - **Refresh policy**: how old each context's data may get
//! - **Schema**: allowed statuses used to validate fetched work items
//!
//! # Example
//!
//! ```rust
//! use servicedesk_state::app::{ContextKind, Dashboard, Payload};
//! use servicedesk_state::Config;
//!
//! let mut dashboard = Dashboard::from_config(&Config::default(), Default::default());
//! assert_eq!(dashboard.due_contexts_at(chrono::Utc::now()).len(), 6);
//!
//! dashboard.context_mut(ContextKind::Users).begin_refresh();
//! dashboard.apply_payload_at(Payload::Users(vec![]), chrono::Utc::now())?;
//! assert!(!dashboard.users.view().loading);
//! # Ok::<(), servicedesk_state::DeskError>(())
//! ```

use super::context::{ContextStatus, ContextSummary, DataContext};
use super::kinds::{ContextKind, Payload};
use super::policy::RefreshPolicy;
use crate::domain::error::{DeskError, Result};
use crate::domain::scoring::rank_queue;
use crate::domain::{
    AsyncState, ItsmSchema, Notification, PulseMetric, QueueEntry, User, WorkItem, WorkType,
};
use crate::Config;
use chrono::{DateTime, Utc};

/// Application-session owner of every data context.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub incidents: DataContext<Vec<WorkItem>>,
    pub service_requests: DataContext<Vec<WorkItem>>,
    pub notifications: DataContext<Vec<Notification>>,
    pub smart_queue: DataContext<Vec<QueueEntry>>,
    pub pulse_metrics: DataContext<Vec<PulseMetric>>,
    pub users: DataContext<Vec<User>>,

    /// Maximum data age per context.
    pub policy: RefreshPolicy,

    /// Work item schema used to validate fetched payloads.
    pub schema: ItsmSchema,

    /// Whether successful loads should be followed by a snapshot save.
    pub persist_snapshots: bool,
}

impl Dashboard {
    /// Creates a dashboard with every context empty.
    #[must_use]
    pub fn new(policy: RefreshPolicy, schema: ItsmSchema) -> Self {
        Self {
            incidents: DataContext::new(ContextKind::Incidents, Vec::new()),
            service_requests: DataContext::new(ContextKind::ServiceRequests, Vec::new()),
            notifications: DataContext::new(ContextKind::Notifications, Vec::new()),
            smart_queue: DataContext::new(ContextKind::SmartQueue, Vec::new()),
            pulse_metrics: DataContext::new(ContextKind::PulseMetrics, Vec::new()),
            users: DataContext::new(ContextKind::Users, Vec::new()),
            policy,
            schema,
            persist_snapshots: false,
        }
    }

    /// Creates a dashboard from the crate configuration.
    #[must_use]
    pub fn from_config(config: &Config, schema: ItsmSchema) -> Self {
        config.refresh.warn_unknown_keys();
        let mut dashboard = Self::new(config.refresh.clone(), schema);
        dashboard.persist_snapshots = config.persist_snapshots;
        dashboard
    }

    /// Record-type independent access to a context.
    #[must_use]
    pub fn context(&self, kind: ContextKind) -> &dyn ContextStatus {
        match kind {
            ContextKind::Incidents => &self.incidents,
            ContextKind::ServiceRequests => &self.service_requests,
            ContextKind::Notifications => &self.notifications,
            ContextKind::SmartQueue => &self.smart_queue,
            ContextKind::PulseMetrics => &self.pulse_metrics,
            ContextKind::Users => &self.users,
        }
    }

    /// Mutable record-type independent access to a context.
    pub fn context_mut(&mut self, kind: ContextKind) -> &mut dyn ContextStatus {
        match kind {
            ContextKind::Incidents => &mut self.incidents,
            ContextKind::ServiceRequests => &mut self.service_requests,
            ContextKind::Notifications => &mut self.notifications,
            ContextKind::SmartQueue => &mut self.smart_queue,
            ContextKind::PulseMetrics => &mut self.pulse_metrics,
            ContextKind::Users => &mut self.users,
        }
    }

    /// Status of every context in display order.
    #[must_use]
    pub fn summaries(&self) -> Vec<ContextSummary> {
        ContextKind::ALL
            .into_iter()
            .map(|kind| self.context(kind).summary())
            .collect()
    }

    /// Contexts whose data should be fetched again as of `now`.
    #[must_use]
    pub fn due_contexts_at(&self, now: DateTime<Utc>) -> Vec<ContextKind> {
        ContextKind::ALL
            .into_iter()
            .filter(|&kind| {
                self.context(kind)
                    .needs_refresh_at(self.policy.max_age(kind), now)
            })
            .collect()
    }

    /// Marks every context whose data outlived its policy as expired.
    pub fn expire_at(&mut self, now: DateTime<Utc>) {
        for kind in ContextKind::ALL {
            let max_age = self.policy.max_age(kind);
            self.context_mut(kind).expire_at(max_age, now);
        }
    }

    /// Applies a successful fetch to its context.
    ///
    /// Work item payloads are validated against the schema first. A payload that
    /// fails validation is recorded as the context's error, the previous data is
    /// kept, and the validation error is returned. Work items without an SLA
    /// target get the schema's target, and smart-queue entries are scored and
    /// ranked as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] if the payload violates the schema.
    pub fn apply_payload_at(&mut self, payload: Payload, now: DateTime<Utc>) -> Result<()> {
        let kind = payload.kind();
        let _span = tracing::debug_span!("apply_payload",
            context = %kind,
            records = payload.len()
        ).entered();

        if let Err(e) = self.validate(&payload) {
            self.context_mut(kind).fail(&e.to_string());
            return Err(e);
        }

        match payload {
            Payload::Incidents(mut items) => {
                self.fill_sla_targets(items.iter_mut());
                self.incidents.resolve_at(Ok::<_, DeskError>(items), now);
            }
            Payload::ServiceRequests(mut items) => {
                self.fill_sla_targets(items.iter_mut());
                self.service_requests.resolve_at(Ok::<_, DeskError>(items), now);
            }
            Payload::Notifications(items) => {
                self.notifications.resolve_at(Ok::<_, DeskError>(items), now);
            }
            Payload::SmartQueue(mut entries) => {
                self.fill_sla_targets(entries.iter_mut().map(|e| &mut e.work_item));
                rank_queue(&mut entries, now);
                self.smart_queue.resolve_at(Ok::<_, DeskError>(entries), now);
            }
            Payload::PulseMetrics(items) => {
                self.pulse_metrics.resolve_at(Ok::<_, DeskError>(items), now);
            }
            Payload::Users(items) => self.users.resolve_at(Ok::<_, DeskError>(items), now),
        }

        Ok(())
    }

    /// Marks a notification read.
    ///
    /// Returns false if no loaded notification has that id.
    pub fn mark_notification_read(&mut self, id: u64) -> bool {
        let mut found = false;
        self.notifications.update_data(|items| {
            if let Some(item) = items.iter_mut().find(|n| n.id == id) {
                item.read = true;
                found = true;
            }
        });
        tracing::debug!(notification_id = id, found = found, "mark notification read");
        found
    }

    /// Number of loaded notifications not yet read.
    #[must_use]
    pub fn unread_notifications(&self) -> usize {
        self.notifications.view().data.iter().filter(|n| !n.read).count()
    }

    /// Serializes a context's state for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Storage`] if serialization fails.
    pub fn snapshot_state(&self, kind: ContextKind) -> Result<serde_json::Value> {
        let value = match kind {
            ContextKind::Incidents => serde_json::to_value(self.incidents.state()),
            ContextKind::ServiceRequests => serde_json::to_value(self.service_requests.state()),
            ContextKind::Notifications => serde_json::to_value(self.notifications.state()),
            ContextKind::SmartQueue => serde_json::to_value(self.smart_queue.state()),
            ContextKind::PulseMetrics => serde_json::to_value(self.pulse_metrics.state()),
            ContextKind::Users => serde_json::to_value(self.users.state()),
        };
        value.map_err(|e| DeskError::Storage(format!("failed to serialize {kind} state: {e}")))
    }

    /// Restores a context from a persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Storage`] if the value is not a state of the
    /// context's record type. The context is left unchanged in that case.
    pub fn restore_state(&mut self, kind: ContextKind, value: serde_json::Value) -> Result<()> {
        match kind {
            ContextKind::Incidents => self.incidents.restore(decode_state(kind, value)?),
            ContextKind::ServiceRequests => self.service_requests.restore(decode_state(kind, value)?),
            ContextKind::Notifications => self.notifications.restore(decode_state(kind, value)?),
            ContextKind::SmartQueue => self.smart_queue.restore(decode_state(kind, value)?),
            ContextKind::PulseMetrics => self.pulse_metrics.restore(decode_state(kind, value)?),
            ContextKind::Users => self.users.restore(decode_state(kind, value)?),
        }
        Ok(())
    }

    fn fill_sla_targets<'a>(&self, items: impl Iterator<Item = &'a mut WorkItem>) {
        for item in items.filter(|item| item.sla_target_minutes.is_none()) {
            item.sla_target_minutes = self.schema.sla_target(item.work_type, Some(item.sla_key()));
        }
    }

    fn validate(&self, payload: &Payload) -> Result<()> {
        match payload {
            Payload::Incidents(items) => self.validate_work_items(items, Some(WorkType::Incident)),
            Payload::ServiceRequests(items) => self.validate_work_items(items, Some(WorkType::Request)),
            Payload::SmartQueue(entries) => {
                let items: Vec<&WorkItem> = entries.iter().map(|e| &e.work_item).collect();
                self.validate_work_items(items, None)
            }
            Payload::Notifications(_) | Payload::PulseMetrics(_) | Payload::Users(_) => Ok(()),
        }
    }

    fn validate_work_items<'a>(
        &self,
        items: impl IntoIterator<Item = &'a WorkItem>,
        expected: Option<WorkType>,
    ) -> Result<()> {
        for item in items {
            if let Some(expected) = expected {
                if item.work_type != expected {
                    return Err(DeskError::Validation(format!(
                        "work item {} is a {}, expected a {expected}",
                        item.id, item.work_type
                    )));
                }
            }
            if !self.schema.validate_status(item.work_type, item.status) {
                return Err(DeskError::Validation(format!(
                    "work item {} has status {} which is not allowed for a {}",
                    item.id, item.status, item.work_type
                )));
            }
        }
        Ok(())
    }
}

fn decode_state<T: serde::de::DeserializeOwned>(
    kind: ContextKind,
    value: serde_json::Value,
) -> Result<AsyncState<T>> {
    serde_json::from_value(value)
        .map_err(|e| DeskError::Storage(format!("invalid {kind} snapshot: {e}")))
}
