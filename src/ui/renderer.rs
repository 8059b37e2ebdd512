//! Plain-text rendering of the report view model.

use crate::app::Dashboard;
use crate::domain::error::{DeskError, Result};
use crate::ui::viewmodel::ReportViewModel;

/// Renders the report as aligned text lines.
///
/// # Example
///
/// ```rust
/// use servicedesk_state::app::Dashboard;
/// use servicedesk_state::ui::{render_report, ReportViewModel};
///
/// let dashboard = Dashboard::new(Default::default(), Default::default());
/// let text = render_report(&ReportViewModel::compute(&dashboard, chrono::Utc::now()));
/// assert!(text.contains("incidents"));
/// ```
#[must_use]
pub fn render_report(vm: &ReportViewModel) -> String {
    let label_width = vm
        .rows
        .iter()
        .map(|row| row.label.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "Service desk ({} unread notifications)",
        vm.unread_notifications
    )];

    for row in &vm.rows {
        lines.push(format!(
            "  {:<label_width$}  {:<24}  {:>5} items  {}",
            row.label, row.badge, row.items, row.age
        ));
        if let Some(error) = &row.error {
            lines.push(format!("  {:<label_width$}  ! {error}", ""));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Renders every context summary of `dashboard` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`DeskError::Output`] if the summaries cannot be serialized.
pub fn render_summaries_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(&dashboard.summaries())
        .map_err(|e| DeskError::Output(format!("failed to serialize summaries: {e}")))
}
