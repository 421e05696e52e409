//! Query box component renderer.
//!
//! Both query inputs share one bordered box; the focused field gets the focus
//! color and a block cursor.

use crate::app::QueryField;
use crate::ui::helpers::{display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the query box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

const CURSOR: char = '█';

/// Renders the 3-line query box at `row` and returns the next row.
///
/// ```text
/// ┌──────────────────────────────────────────┐
/// │ Name: ann█            City: lake         │
/// └──────────────────────────────────────────┘
/// ```
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let half = inner_width / 2;

    let border = if search.focus.is_some() {
        &theme.colors.search_bar_focus
    } else {
        &theme.colors.search_bar_border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("│");
    let used = render_field(QueryField::Name, &search.name_query, search.focus, half, theme)
        + render_field(QueryField::City, &search.city_query, search.focus, inner_width - half, theme);
    print!("{}", " ".repeat(inner_width.saturating_sub(used)));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}

/// Prints one labelled field padded to `width`; returns the cells printed.
fn render_field(field: QueryField, query: &str, focus: Option<QueryField>, width: usize, theme: &Theme) -> usize {
    let focused = focus == Some(field);
    let label = format!(" {}: ", field.label());

    if focused {
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.search_bar_focus));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{label}");
    print!("{}", Theme::reset());

    let mut text = query.to_string();
    if focused {
        text.push(CURSOR);
    }
    let available = width.saturating_sub(display_width(&label));
    let text: String = text.chars().rev().take(available).collect::<Vec<_>>().into_iter().rev().collect();

    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{text}");
    let printed = display_width(&label) + display_width(&text);
    print!("{}", " ".repeat(width.saturating_sub(printed)));
    printed.max(width)
}
