//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready strings,
//! highlight ranges, and selection flags.

use crate::app::QueryField;

/// Width of the NAME column, including the gap to the next column.
pub const NAME_WIDTH: usize = 28;
/// Width of the CITY column.
pub const CITY_WIDTH: usize = 18;
/// Width of the EMAIL column.
pub const EMAIL_WIDTH: usize = 28;
/// Width of the PHONE column.
pub const PHONE_WIDTH: usize = 24;
/// Width of the DISTANCE column, shown only after a distance sort.
pub const DISTANCE_WIDTH: usize = 10;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Rows of the derived view that fit on screen.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,

    /// Name and city query inputs.
    pub search_bar: SearchBarInfo,

    /// Selectable sort modes.
    pub sort_bar: SortBarInfo,

    /// Extra information about the selected record.
    pub details: Option<String>,

    /// Whether the DISTANCE column is shown.
    pub show_distance: bool,

    pub footer: FooterInfo,

    /// Message shown in place of the table when there are no rows.
    pub empty_state: Option<EmptyState>,
}

/// One directory row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub name: String,
    pub city: String,
    pub email: String,
    pub phone: String,

    /// Formatted distance, when the list is annotated.
    pub distance: Option<String>,

    pub is_selected: bool,

    /// Query match ranges in `name`, as `(start, end)` character indices.
    pub name_highlights: Vec<(usize, usize)>,

    /// Query match ranges in `city`.
    pub city_highlights: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title with row counts and fetch age.
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g., "No matches").
    pub message: String,

    /// Secondary hint (e.g., "Adjust the name or city query").
    pub subtitle: String,
}

/// The two query inputs.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    pub name_query: String,
    pub city_query: String,

    /// Field receiving keystrokes, if any.
    pub focus: Option<QueryField>,
}

#[derive(Debug, Clone)]
pub struct SortBarInfo {
    pub options: Vec<SortOption>,
}

/// One entry of the sort bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOption {
    pub label: String,
    pub shortcut: char,
    /// Whether this is the last selected mode.
    pub active: bool,
}
