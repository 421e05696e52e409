//! Footer component renderer.
//!
//! The footer area is two lines: the selected record's details above the
//! bottom border, and the centered keybinding hints below it.

use crate::ui::helpers::{display_width, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the keybinding hints centered in dim text and returns the next row.
///
/// Hints wider than the terminal are truncated.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = truncate(&footer.keybindings, cols);
    let text_len = display_width(&help_text);
    let padding = (cols.saturating_sub(text_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_len)));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the details line for the selected record, or a blank line.
pub fn render_details(row: usize, details: Option<&str>, theme: &Theme, cols: usize) -> usize {
    let text = details.map(|d| format!(" {d}")).unwrap_or_default();
    let text_len = display_width(&text);

    position_cursor(row, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(text_len)));
    print!("{}", Theme::reset());
    row + 1
}
