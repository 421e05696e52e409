//! Sandbox path helpers.
//!
//! Zellij mounts the host filesystem under `/host` inside the plugin sandbox.
//! The plugin keeps nothing there except its trace file and optional theme
//! files referenced from configuration.

use std::path::PathBuf;

/// Directory holding the plugin's trace output.
///
/// Resolves to `/host/.local/share/zellij/yellowpage`, which is
/// `~/.local/share/zellij/yellowpage` when Zellij was started from the home
/// directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("yellowpage")
}

/// Maps `~`-prefixed paths from configuration to their sandbox location.
///
/// ```
/// use yellowpage::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
