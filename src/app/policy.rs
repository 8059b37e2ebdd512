//! Refresh thresholds per context.
//!
//! The policy only answers "how old may this context's data get". Nothing in
//! the crate polls it on a timer; callers ask for due contexts when they want to
//! refresh (see [`crate::app::Event::RefreshDue`]).

use super::kinds::ContextKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default maximum age of loaded data, in seconds.
pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

/// Maximum data age per context.
///
/// # TOML Format
///
/// ```toml
/// [refresh]
/// default_max_age_secs = 300
///
/// [refresh.max_age_secs]
/// notifications = 30
/// pulse-metrics = 60
/// ```
///
/// Keys of `max_age_secs` are context names; unknown names are ignored with a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshPolicy {
    /// Maximum age for contexts without an override.
    pub default_max_age_secs: u64,

    /// Per-context overrides keyed by context name.
    pub max_age_secs: BTreeMap<String, u64>,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            default_max_age_secs: DEFAULT_MAX_AGE_SECS,
            max_age_secs: BTreeMap::new(),
        }
    }
}

impl RefreshPolicy {
    /// Maximum data age for `kind`.
    ///
    /// ```rust
    /// use servicedesk_state::app::{ContextKind, RefreshPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RefreshPolicy::default().with_max_age(ContextKind::Notifications, 30);
    /// assert_eq!(policy.max_age(ContextKind::Notifications), Duration::from_secs(30));
    /// assert_eq!(policy.max_age(ContextKind::Users), Duration::from_secs(300));
    /// ```
    #[must_use]
    pub fn max_age(&self, kind: ContextKind) -> Duration {
        let secs = self
            .max_age_secs
            .get(kind.as_str())
            .copied()
            .unwrap_or(self.default_max_age_secs);
        Duration::from_secs(secs)
    }

    /// Returns the policy with an override for `kind`.
    #[must_use]
    pub fn with_max_age(mut self, kind: ContextKind, secs: u64) -> Self {
        self.max_age_secs.insert(kind.as_str().to_string(), secs);
        self
    }

    /// Logs overrides whose key names no context.
    pub fn warn_unknown_keys(&self) {
        for key in self.max_age_secs.keys() {
            if ContextKind::from_name(key).is_none() {
                tracing::warn!(key = %key, "ignoring refresh override for unknown context");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_from_toml() {
        let policy: RefreshPolicy = toml::from_str(
            r#"
            default_max_age_secs = 120
            [max_age_secs]
            smart-queue = 15
            "#,
        )
        .unwrap();
        assert_eq!(policy.max_age(ContextKind::SmartQueue), Duration::from_secs(15));
        assert_eq!(policy.max_age(ContextKind::Incidents), Duration::from_secs(120));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let policy: RefreshPolicy = toml::from_str("").unwrap();
        assert_eq!(policy, RefreshPolicy::default());
    }
}
