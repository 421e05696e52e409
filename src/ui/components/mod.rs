//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with counts and fetch age
//! - [`search`]: Name and city query inputs
//! - [`sort`]: Sort mode selector
//! - [`table`]: Directory rows (NAME, CITY, EMAIL, PHONE, optional DISTANCE)
//! - [`empty`]: Message shown in place of the table
//! - [`footer`]: Details line and keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Query box - 3 lines]
//! [Sort bar]
//! [Table Headers]
//! [Table Rows | Empty state]
//! [Details]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod search;
mod sort;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::{render_details, render_footer};
use header::render_header;
use search::render_search_bar;
use sort::render_sort_bar;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal separator line, returning the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full plugin layout for a terminal of `cols` x `rows`.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_search_bar(current_row, &vm.search_bar, theme, cols);
    current_row = render_sort_bar(current_row, &vm.sort_bar, theme, cols);
    current_row = render_table_headers(current_row, vm.show_distance, theme);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row + 1, empty, theme, cols);
    } else {
        render_table_rows(current_row, &vm.display_items, vm.show_distance, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let details_row = border_row.saturating_sub(1);

    render_details(details_row, vm.details.as_deref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
