//! Text report of the dashboard contexts.
//!
//! ```text
//! Dashboard → ReportViewModel::compute → ReportViewModel → render_report → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready rows computed from context summaries
//! - [`renderer`]: Plain-text rendering

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_report, render_summaries_json};
pub use viewmodel::{ReportViewModel, StatusRow};
