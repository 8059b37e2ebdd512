//! Typed work item schema: allowed statuses and SLA targets per work type.
//!
//! The schema is a configuration document loaded once at startup. Validation
//! takes strongly typed enums, so unknown work types or statuses are rejected
//! when the document or a payload is deserialized rather than at comparison
//! time.
//!
//! # TOML Format
//!
//! ```toml
//! [incident]
//! statuses = ["new", "in_progress", "resolved", "closed"]
//! sla = { priority_1 = 60, priority_2 = 120, priority_3 = 240 }
//!
//! [request]
//! statuses = ["new", "in_progress", "fulfilled", "closed"]
//! sla = { standard = 480 }
//! ```
//!
//! Work types missing from the document allow no statuses and have no SLA.
//! Unknown work types, statuses and SLA keys are rejected.

use crate::domain::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of work item tracked by the service desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Incident,
    Request,
    Problem,
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incident => "incident",
            Self::Request => "request",
            Self::Problem => "problem",
        })
    }
}

/// Workflow status of a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    New,
    InProgress,
    Analysis,
    Resolved,
    Fulfilled,
    Closed,
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Analysis => "analysis",
            Self::Resolved => "resolved",
            Self::Fulfilled => "fulfilled",
            Self::Closed => "closed",
        })
    }
}

/// Priority of a work item, `priority_1` being the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "priority_1")]
    Priority1,
    #[serde(rename = "priority_2")]
    Priority2,
    #[serde(rename = "priority_3")]
    Priority3,
    #[serde(rename = "priority_4")]
    Priority4,
}

impl Priority {
    /// Key under which an SLA table stores this priority's target.
    #[must_use]
    pub const fn sla_key(self) -> SlaKey {
        match self {
            Self::Priority1 => SlaKey::Priority1,
            Self::Priority2 => SlaKey::Priority2,
            Self::Priority3 => SlaKey::Priority3,
            Self::Priority4 => SlaKey::Priority4,
        }
    }
}

/// Key of an SLA table entry.
///
/// `Default` is the fallback target for a work type. `Standard` is the
/// named service-request tier, looked up only when asked for explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaKey {
    #[serde(rename = "priority_1")]
    Priority1,
    #[serde(rename = "priority_2")]
    Priority2,
    #[serde(rename = "priority_3")]
    Priority3,
    #[serde(rename = "priority_4")]
    Priority4,
    Standard,
    Default,
}

/// SLA targets in minutes, one optional entry per [`SlaKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlaTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_2: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_3: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_4: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
}

impl SlaTargets {
    /// Target stored under `key`.
    #[must_use]
    pub const fn get(&self, key: SlaKey) -> Option<u32> {
        match key {
            SlaKey::Priority1 => self.priority_1,
            SlaKey::Priority2 => self.priority_2,
            SlaKey::Priority3 => self.priority_3,
            SlaKey::Priority4 => self.priority_4,
            SlaKey::Standard => self.standard,
            SlaKey::Default => self.default,
        }
    }
}

/// Allowed statuses and SLA targets of one work type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkTypeRules {
    /// Statuses a work item of this type may carry.
    #[serde(default)]
    pub statuses: Vec<WorkStatus>,

    /// SLA targets in minutes.
    #[serde(default)]
    pub sla: SlaTargets,
}

/// The full schema document, one optional rule set per work type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItsmSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident: Option<WorkTypeRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<WorkTypeRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<WorkTypeRules>,
}

impl ItsmSchema {
    /// Parses a schema from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Schema`] if the document is not valid TOML or names
    /// an unknown work type, status or SLA key.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DeskError::Schema(format!("failed to parse schema: {e}")))
    }

    /// Loads a schema from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading work item schema");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Rules for a work type, if the schema defines it.
    #[must_use]
    pub const fn rules(&self, work_type: WorkType) -> Option<&WorkTypeRules> {
        match work_type {
            WorkType::Incident => self.incident.as_ref(),
            WorkType::Request => self.request.as_ref(),
            WorkType::Problem => self.problem.as_ref(),
        }
    }

    /// Returns true if `status` is allowed for `work_type`.
    ///
    /// ```rust
    /// use servicedesk_state::domain::schema::{ItsmSchema, WorkStatus, WorkType};
    ///
    /// let schema = ItsmSchema::default();
    /// assert!(schema.validate_status(WorkType::Incident, WorkStatus::New));
    /// assert!(!schema.validate_status(WorkType::Incident, WorkStatus::Fulfilled));
    /// ```
    #[must_use]
    pub fn validate_status(&self, work_type: WorkType, status: WorkStatus) -> bool {
        self.rules(work_type)
            .is_some_and(|rules| rules.statuses.contains(&status))
    }

    /// SLA target in minutes for a work type.
    ///
    /// Uses the target for `key` when the type defines one, otherwise the
    /// type's `default` target, otherwise `None`.
    #[must_use]
    pub fn sla_target(&self, work_type: WorkType, key: Option<SlaKey>) -> Option<u32> {
        let sla = &self.rules(work_type)?.sla;
        key.and_then(|k| sla.get(k)).or(sla.default)
    }
}

impl Default for ItsmSchema {
    fn default() -> Self {
        use WorkStatus::{Analysis, Closed, Fulfilled, InProgress, New, Resolved};

        Self {
            incident: Some(WorkTypeRules {
                statuses: vec![New, InProgress, Resolved, Closed],
                sla: SlaTargets {
                    priority_1: Some(60),
                    priority_2: Some(120),
                    priority_3: Some(240),
                    ..SlaTargets::default()
                },
            }),
            request: Some(WorkTypeRules {
                statuses: vec![New, InProgress, Fulfilled, Closed],
                sla: SlaTargets {
                    standard: Some(480),
                    ..SlaTargets::default()
                },
            }),
            problem: Some(WorkTypeRules {
                statuses: vec![New, Analysis, Resolved, Closed],
                sla: SlaTargets {
                    default: Some(1440),
                    ..SlaTargets::default()
                },
            }),
        }
    }
}
