//! Table component renderer.
//!
//! Renders the derived view as fixed-width columns. Query matches in NAME and
//! CITY are highlighted; the selected row gets a full-width background.

use crate::ui::helpers::{self, display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, CITY_WIDTH, DISTANCE_WIDTH, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH};

/// Renders the bold column headers and returns the next row.
pub fn render_table_headers(row: usize, show_distance: bool, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(
        " {:<NAME_WIDTH$}{:<CITY_WIDTH$}{:<EMAIL_WIDTH$}{:<PHONE_WIDTH$}",
        "NAME", "CITY", "EMAIL", "PHONE"
    );
    if show_distance {
        print!("{:>DISTANCE_WIDTH$}", "DISTANCE");
    }
    print!("{}", Theme::reset());
    row + 1
}

/// Renders all rows starting at `row` and returns the next free row.
pub fn render_table_rows(row: usize, items: &[DisplayItem], show_distance: bool, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, show_distance, theme, cols);
    }
    current_row
}

fn render_table_row(row: usize, item: &DisplayItem, show_distance: bool, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base = if item.is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    print!("{base}");
    print!(" ");

    render_cell(&item.name, &item.name_highlights, NAME_WIDTH, theme, item.is_selected);
    render_cell(&item.city, &item.city_highlights, CITY_WIDTH, theme, item.is_selected);
    render_cell(&item.email, &[], EMAIL_WIDTH, theme, item.is_selected);
    render_cell(&item.phone, &[], PHONE_WIDTH, theme, item.is_selected);

    let mut line_len = 1 + NAME_WIDTH + CITY_WIDTH + EMAIL_WIDTH + PHONE_WIDTH;
    if show_distance {
        let distance = item.distance.as_deref().unwrap_or("");
        if !item.is_selected {
            print!("{}", Theme::fg(&theme.colors.distance_fg));
        }
        print!("{distance:>DISTANCE_WIDTH$}");
        print!("{base}");
        line_len += DISTANCE_WIDTH;
    }

    print!("{}", " ".repeat(cols.saturating_sub(line_len)));
    print!("{}", Theme::reset());
    row + 1
}

/// Prints `text` with highlights, padded to `width` cells.
fn render_cell(text: &str, ranges: &[(usize, usize)], width: usize, theme: &Theme, is_selected: bool) {
    helpers::render_highlighted_text(text, ranges, theme, is_selected);
    print!("{}", " ".repeat(width.saturating_sub(display_width(text))));
}
