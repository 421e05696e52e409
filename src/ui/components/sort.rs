//! Sort bar component renderer.

use crate::ui::helpers::{display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SortBarInfo;

/// Renders the available sort modes on one line and returns the next row.
///
/// ```text
///  Sort:  [1] First name, A-Z   [2] Last name, A-Z   [3] City, A-Z
/// ```
///
/// The active mode is drawn with the `sort_active_*` colors. Modes that are
/// not available are not in `sort.options` at all.
pub fn render_sort_bar(row: usize, sort: &SortBarInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(" Sort: ");
    let mut used = 7;

    for option in &sort.options {
        let entry = format!(" [{}] {} ", option.shortcut, option.label);
        let width = display_width(&entry) + 1;
        if used + width > cols {
            break;
        }

        print!(" ");
        if option.active {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.sort_active_fg));
            print!("{}", Theme::bg(&theme.colors.sort_active_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        print!("{entry}");
        print!("{}", Theme::reset());
        used += width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}
