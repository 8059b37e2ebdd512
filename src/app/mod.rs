//! Application layer coordinating contexts, events, and actions.
//!
//! This module sits between the callers (views, the CLI) and the domain,
//! storage and source layers. It owns the per-domain data contexts and the
//! event handler that transitions them.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → Context Transitions → Actions → Side Effects
//!                           ↑                                             ↓
//!                           └─────────────── Fetch Outcomes ──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`context`]: Per-domain owner of one async state
//! - [`dashboard`]: Session-scoped owner of every context
//! - [`handler`]: Event processing and transition coordination
//! - [`kinds`]: Context identifiers and fetch payloads
//! - [`policy`]: Refresh thresholds per context

pub mod actions;
pub mod context;
pub mod dashboard;
pub mod handler;
pub mod kinds;
pub mod policy;

pub use actions::Action;
pub use context::{ContextStatus, ContextSummary, ContextView, DataContext};
pub use dashboard::Dashboard;
pub use handler::{handle_event, Event};
pub use kinds::{ContextKind, Payload};
pub use policy::RefreshPolicy;
