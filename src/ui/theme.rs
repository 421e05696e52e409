//! Theme management and ANSI escape sequence generation.
//!
//! Built-in themes are compiled in from `themes/*.toml`; custom themes are
//! loaded from a TOML file with the same layout.
//!
//! # Built-in Themes
//!
//! - `yellow-page`: blue on yellow, the classic directory look (default)
//! - `yellow-page-dark`: the same palette muted for dark terminals
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#517490"
//! header_bg = "#fce16b"
//! selection_fg = "#fce16b"
//! selection_bg = "#517490"
//! text_normal = "#efe4b0"
//! text_dim = "#c7c8ca"
//! border = "#e4c970"
//! search_bar_border = "#c7c8ca"
//! search_bar_focus = "#fce16b"
//! match_highlight_fg = "#1f2a33"
//! match_highlight_bg = "#fce16b"
//! empty_state_fg = "#517490"
//! sort_active_fg = "#1f2a33"
//! sort_active_bg = "#e4c970"
//! distance_fg = "#517490"
//! ```

use crate::domain::error::{Result, YellowPageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "yellow-page";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, details line, and secondary text.
    pub text_dim: String,

    pub border: String,

    /// Query box border when the box is not focused.
    pub search_bar_border: String,
    /// Query box border and label while typing.
    pub search_bar_focus: String,

    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Sort bar entry for the last selected mode.
    pub sort_active_fg: String,
    pub sort_active_bg: String,

    /// DISTANCE column text.
    pub distance_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "yellow-page" => include_str!("../../themes/yellow-page.toml"),
            "yellow-page-dark" => include_str!("../../themes/yellow-page-dark.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`YellowPageError::Theme`] if the file cannot be read or is not
    /// a valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            YellowPageError::Theme(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;

        toml::from_str(&contents).map_err(|e| YellowPageError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to RGB, falling back to white on bad input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Palette used if the bundled default ever fails to parse.
    fn fallback() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                header_fg: "#517490".to_string(),
                header_bg: Some("#fce16b".to_string()),
                selection_fg: "#fce16b".to_string(),
                selection_bg: "#517490".to_string(),
                text_normal: "#efe4b0".to_string(),
                text_dim: "#c7c8ca".to_string(),
                border: "#e4c970".to_string(),
                search_bar_border: "#c7c8ca".to_string(),
                search_bar_focus: "#fce16b".to_string(),
                match_highlight_fg: "#1f2a33".to_string(),
                match_highlight_bg: "#fce16b".to_string(),
                empty_state_fg: "#517490".to_string(),
                sort_active_fg: "#1f2a33".to_string(),
                sort_active_bg: "#e4c970".to_string(),
                distance_fg: "#517490".to_string(),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        assert_eq!(Theme::from_name("yellow-page").map(|t| t.name), Some("yellow-page".to_string()));
        assert!(Theme::from_name("yellow-page-dark").is_some());
        assert!(Theme::from_name("catppuccin-mocha").is_none());
    }

    #[test]
    fn default_matches_bundled_palette() {
        assert_eq!(Theme::default(), Theme::fallback());
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(Theme::fg("#517490"), "\u{1b}[38;2;81;116;144m");
        assert_eq!(Theme::bg("fce16b"), "\u{1b}[48;2;252;225;107m");
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn loads_custom_theme_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = include_str!("../../themes/yellow-page-dark.toml").replace("yellow-page-dark", "mine");
        file.write_all(body.as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "mine");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"name = 3").unwrap();
        assert!(matches!(Theme::from_file(broken.path()), Err(YellowPageError::Theme(_))));
        assert!(Theme::from_file("/definitely/not/here.toml").is_err());
    }
}
