//! Domain layer for the service desk state crate.
//!
//! This module contains the async state shape, the dashboard's domain records
//! and the typed work item schema, independent of storage, sources and
//! observability.
//!
//! # Organization
//!
//! - [`async_state`]: The lifecycle shape and its transitions
//! - [`error`]: Error types and result aliases
//! - [`models`]: Work items, queue rows, notifications, metrics, users
//! - [`schema`]: Allowed statuses and SLA targets per work type
//! - [`scoring`]: Smart-queue triage scores and ranking
//!
//! # Examples
//!
//! ```
//! use servicedesk_state::domain::{AsyncState, WorkItem};
//!
//! let incidents: AsyncState<Vec<WorkItem>> = AsyncState::empty(Vec::new());
//! assert!(incidents.data.is_empty());
//! ```

pub mod async_state;
pub mod error;
pub mod models;
pub mod schema;
pub mod scoring;

pub use async_state::{AsyncState, Phase, Staleness};
pub use error::{DeskError, Result};
pub use models::{Notification, PulseMetric, QueueEntry, User, WorkItem};
pub use schema::{ItsmSchema, Priority, SlaKey, WorkStatus, WorkType};
