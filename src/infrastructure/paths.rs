//! Path resolution for data files and configured paths.
//!
//! The data directory follows the XDG convention: `$XDG_DATA_HOME` if set,
//! otherwise `~/.local/share`, with a `servicedesk-state` subdirectory. Snapshot
//! and log files live inside it.

use std::path::{Path, PathBuf};

/// Name of the crate's subdirectory under the user data directory.
const APP_DIR: &str = "servicedesk-state";

/// Returns the default data directory.
///
/// Falls back to `./.servicedesk-state` when neither `XDG_DATA_HOME` nor `HOME`
/// is set.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    data_dir_from(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        home_dir(),
    )
}

fn data_dir_from(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        .map_or_else(|| PathBuf::from(format!(".{APP_DIR}")), |base| base.join(APP_DIR))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when `HOME` is unset, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use servicedesk_state::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Resolves a configured path: expands `~` and makes relative paths relative to `base`.
#[must_use]
pub fn resolve_path(path: &str, base: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
