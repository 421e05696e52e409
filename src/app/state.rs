//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of everything the plugin knows: the record
//! store, the location provider, the transient query strings, the selected
//! sort mode, and the cursor. The filtered view is never stored; it is derived
//! from the working list and the queries every time it is needed, which is
//! what keeps the rendered rows consistent with deletions and sorts.
//!
//! # Example
//!
//! ```rust
//! use yellowpage::app::AppState;
//! use yellowpage::ui::Theme;
//!
//! let state = AppState::new(Theme::default());
//! let viewmodel = state.compute_viewmodel(24, 120);
//! assert!(viewmodel.display_items.is_empty());
//! ```

use super::modes::{InputMode, QueryField};
use crate::directory::{derive_view, match_range, Directory, Query, SortMode};
use crate::domain::{HumanNameParser, Listing, NameParser};
use crate::infrastructure::Geolocation;
use crate::ui::helpers::{time_ago, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, SortBarInfo, SortOption, UIViewModel,
    CITY_WIDTH, EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH,
};
use std::sync::Arc;

/// Default directory endpoint.
pub const DEFAULT_DIRECTORY_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Default IP geolocation endpoint.
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Rows taken by everything except the table body: blank line, header,
/// border, query box (3), sort bar, table headers, details line, border,
/// footer, and the unused last row.
const CHROME_ROWS: usize = 12;

/// Progress of the one-time directory fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Waiting for the web access permission.
    Idle,
    /// Request issued, response or decode outstanding.
    Loading,
    /// Records installed; unix timestamp of the load.
    Loaded { fetched_at: i64 },
    /// Fetch or decode failed; the lists stay empty for the session.
    Failed,
}

/// Remote endpoints the plugin reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub directory_url: String,
    pub geolocation_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
        }
    }
}

/// Central application state container.
///
/// Owned by the plugin shim and mutated only through [`handle_event`] and the
/// methods below. Nothing here talks to the Zellij host, so the whole state
/// machine runs in plain unit tests.
///
/// # Invariants
///
/// - `selected_index` indexes into [`AppState::visible`] (or is 0 when it is
///   empty); every method that can shrink the view clamps it.
/// - `sort_mode` is `Some` exactly when the working list is ordered by that
///   mode. Restore puts rows back in fetch order and clears it.
/// - `Distance` is only ever the active mode once the geolocation provider
///   reports a position.
///
/// [`handle_event`]: crate::app::handle_event
#[derive(Debug, Clone)]
pub struct AppState {
    /// Canonical and working record lists.
    pub directory: Directory,

    /// One-shot location acquisition; gates the distance sort.
    pub geolocation: Geolocation,

    /// Name and city query strings, applied at render time only.
    pub query: Query,

    /// Mode the working list is currently ordered by. `None` after a restore,
    /// when rows are in fetch order.
    pub sort_mode: Option<SortMode>,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Cursor position within the derived view.
    pub selected_index: usize,

    /// Directory fetch progress.
    pub fetch: FetchStatus,

    /// Where to fetch from.
    pub endpoints: Endpoints,

    /// Color scheme for rendering.
    pub theme: Theme,

    /// Name key extractor used by the name sorts.
    pub parser: Arc<dyn NameParser + Send + Sync>,
}

impl AppState {
    /// Creates an empty state using the default endpoints and name parser.
    ///
    /// The directory stays empty and the fetch `Idle` until the permission
    /// result arrives; see [`crate::initialize`] for configuration.
    ///
    /// # Parameters
    ///
    /// * `theme` - Color scheme for rendering
    ///
    /// # Example
    ///
    /// ```rust
    /// use yellowpage::app::{AppState, FetchStatus};
    /// use yellowpage::ui::Theme;
    ///
    /// let state = AppState::new(Theme::default());
    /// assert_eq!(state.fetch, FetchStatus::Idle);
    /// assert!(state.visible().is_empty());
    /// ```
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            directory: Directory::new(),
            geolocation: Geolocation::new(),
            query: Query::default(),
            sort_mode: Some(SortMode::FirstName),
            input_mode: InputMode::Normal,
            selected_index: 0,
            fetch: FetchStatus::Idle,
            endpoints: Endpoints::default(),
            theme,
            parser: Arc::new(HumanNameParser),
        }
    }

    /// Rows currently visible under the query, in working-list order.
    ///
    /// Derived on every call from the working list and both query strings;
    /// there is no cached filtered list to go stale.
    ///
    /// # Returns
    ///
    /// Borrowed rows of the working list that match both queries. Every row
    /// when both queries are empty.
    #[must_use]
    pub fn visible(&self) -> Vec<&Listing> {
        derive_view(self.directory.working(), &self.query)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    /// Returns the row under the cursor, if any.
    ///
    /// # Returns
    ///
    /// - `Some(&Listing)` if a row is selected
    /// - `None` if no rows are visible
    #[must_use]
    pub fn selected_listing(&self) -> Option<&Listing> {
        self.visible().get(self.selected_index).copied()
    }

    /// Moves the cursor down by one row, wrapping to the top.
    ///
    /// Called by the `KeyDown` event handler. No-op when nothing is visible.
    pub fn move_selection_down(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves the cursor up by one row, wrapping to the bottom.
    ///
    /// Called by the `KeyUp` event handler. No-op when nothing is visible.
    pub fn move_selection_up(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Keeps the cursor inside the derived view after it shrank.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_count();
        self.selected_index = if count == 0 {
            0
        } else {
            self.selected_index.min(count - 1)
        };
    }

    /// Sort modes the user may currently pick.
    ///
    /// `Distance` is included only once a position is known; while the lookup
    /// is pending or after it failed, the mode is neither listed nor selectable.
    #[must_use]
    pub fn available_sort_modes(&self) -> Vec<SortMode> {
        SortMode::available(self.geolocation.distance_available())
    }

    /// Re-sorts the current working list (deletions included) by `mode`.
    ///
    /// Modes that are not currently available are refused without touching
    /// any state. Selecting the active mode again re-runs the sort.
    ///
    /// # Parameters
    ///
    /// * `mode` - Key to order the working list by
    ///
    /// # Returns
    ///
    /// `true` if the list was re-sorted and needs a render, `false` if the
    /// mode was refused.
    ///
    /// # Example
    ///
    /// ```rust
    /// use yellowpage::app::AppState;
    /// use yellowpage::ui::Theme;
    /// use yellowpage::SortMode;
    ///
    /// let mut state = AppState::new(Theme::default());
    /// assert!(!state.select_sort(SortMode::Distance));
    /// assert!(state.select_sort(SortMode::City));
    /// assert_eq!(state.sort_mode, Some(SortMode::City));
    /// ```
    pub fn select_sort(&mut self, mode: SortMode) -> bool {
        if !self.available_sort_modes().contains(&mode) {
            tracing::debug!(mode = ?mode, "sort mode not available, ignoring");
            return false;
        }

        let origin = self.geolocation.origin();
        match self.directory.sort(mode, origin, self.parser.as_ref()) {
            Ok(()) => {
                self.sort_mode = Some(mode);
                self.clamp_selection();
                true
            }
            Err(e) => {
                tracing::warn!(mode = ?mode, error = %e, "sort failed");
                false
            }
        }
    }

    /// Selects the next available sort mode after the active one.
    ///
    /// Starts over at first name when no mode is active (after a restore).
    pub fn cycle_sort(&mut self) -> bool {
        let modes = self.available_sort_modes();
        let next = self
            .sort_mode
            .and_then(|active| modes.iter().position(|m| *m == active))
            .map_or(SortMode::FirstName, |i| modes[(i + 1) % modes.len()]);
        self.select_sort(next)
    }

    /// Removes the highlighted record from the working list.
    ///
    /// The record is identified by id from the derived view, so with a query
    /// active the row the user sees is the one that goes.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed, `false` when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_listing().map(Listing::id) else {
            tracing::debug!("nothing selected to delete");
            return false;
        };
        let removed = self.directory.delete(id);
        self.clamp_selection();
        removed
    }

    /// Resets the working list to the canonical records, if anything was
    /// deleted.
    ///
    /// Rows come back in fetch order without distance annotations, so no sort
    /// mode is active afterwards.
    ///
    /// # Returns
    ///
    /// `true` if the list was restored, `false` when restore is disabled.
    pub fn restore(&mut self) -> bool {
        if !self.directory.can_restore() {
            tracing::debug!("restore disabled, nothing removed");
            return false;
        }
        self.directory.restore();
        self.sort_mode = None;
        self.clamp_selection();
        true
    }

    /// The query string that typed characters go to for `field`.
    pub fn query_field_mut(&mut self, field: QueryField) -> &mut String {
        match field {
            QueryField::Name => &mut self.query.name,
            QueryField::City => &mut self.query.city,
        }
    }

    /// Computes a renderable view model for a terminal of `rows` x `cols`.
    ///
    /// Derives the filtered view, windows it around the cursor, and prepares
    /// highlight ranges for the query matches.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", rows = rows, cols = cols).entered();

        let visible = self.visible();
        let show_distance = self.directory.is_annotated();

        let available_rows = rows.saturating_sub(CHROME_ROWS).max(1);
        let mut start = self
            .selected_index
            .saturating_sub(available_rows / 2)
            .min(visible.len());
        let end = (start + available_rows).min(visible.len());
        if end - start < available_rows && visible.len() >= available_rows {
            start = end.saturating_sub(available_rows);
        }

        let display_items: Vec<DisplayItem> = visible[start..end]
            .iter()
            .enumerate()
            .map(|(offset, listing)| self.compute_display_item(listing, start + offset == self.selected_index))
            .collect();

        let details = visible
            .get(self.selected_index)
            .map(|l| truncate(&l.user.info_line(), cols.saturating_sub(2)));

        UIViewModel {
            empty_state: if visible.is_empty() { Some(self.compute_empty_state()) } else { None },
            display_items,
            selected_index: self.selected_index.saturating_sub(start),
            header: self.compute_header(visible.len()),
            search_bar: self.compute_search_bar(),
            sort_bar: self.compute_sort_bar(),
            details,
            show_distance,
            footer: self.compute_footer(),
        }
    }

    fn compute_display_item(&self, listing: &Listing, is_selected: bool) -> DisplayItem {
        let user = &listing.user;
        DisplayItem {
            name: truncate(&user.name, NAME_WIDTH - 2),
            city: truncate(&user.address.city, CITY_WIDTH - 2),
            email: truncate(&user.email, EMAIL_WIDTH - 2),
            phone: truncate(&user.phone, PHONE_WIDTH - 2),
            distance: listing.distance.map(crate::domain::geo::format_distance),
            is_selected,
            name_highlights: clamp_highlight(match_range(&user.name, &self.query.name), NAME_WIDTH - 2),
            city_highlights: clamp_highlight(match_range(&user.address.city, &self.query.city), CITY_WIDTH - 2),
        }
    }

    fn compute_header(&self, shown: usize) -> HeaderInfo {
        let total = self.directory.working().len();
        let age = match self.fetch {
            FetchStatus::Loaded { fetched_at } => {
                format!(" · fetched {}", time_ago(fetched_at, chrono::Utc::now().timestamp()))
            }
            _ => String::new(),
        };
        HeaderInfo {
            title: format!(" The Yellow Page ({shown}/{total}){age} "),
        }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        SearchBarInfo {
            name_query: self.query.name.clone(),
            city_query: self.query.city.clone(),
            focus: match self.input_mode {
                InputMode::Query(field) => Some(field),
                InputMode::Normal => None,
            },
        }
    }

    fn compute_sort_bar(&self) -> SortBarInfo {
        SortBarInfo {
            options: self
                .available_sort_modes()
                .into_iter()
                .map(|mode| SortOption {
                    label: mode.label().to_string(),
                    shortcut: mode.shortcut(),
                    active: Some(mode) == self.sort_mode,
                })
                .collect(),
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let (message, subtitle) = match self.fetch {
            FetchStatus::Idle => ("Waiting for permissions", "Grant web access to load the directory"),
            FetchStatus::Loading => ("Loading directory...", "Fetching entries"),
            FetchStatus::Failed => ("Directory unavailable", "The directory could not be fetched"),
            FetchStatus::Loaded { .. } if self.directory.working().is_empty() => {
                ("Everyone has been removed", "Press r to restore the list")
            }
            FetchStatus::Loaded { .. } => ("No matches", "Adjust the name or city query"),
        };
        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Query(field) => format!(
                "Typing {}  Tab: switch field  Enter: results  ESC: clear queries",
                field.label().to_lowercase()
            ),
            InputMode::Normal => {
                let restore = if self.directory.can_restore() {
                    format!("r: restore ({} removed)", self.directory.removed_count())
                } else {
                    "r: restore (nothing removed)".to_string()
                };
                format!("j/k: navigate  /: name  c: city  1-4/s: sort  d: delete  {restore}  q: quit")
            }
        };
        FooterInfo { keybindings }
    }
}

fn clamp_highlight(range: Option<(usize, usize)>, width: usize) -> Vec<(usize, usize)> {
    range
        .filter(|(start, _)| *start < width)
        .map(|(start, end)| (start, end.min(width)))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, UserRecord};

    fn users() -> Vec<UserRecord> {
        serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Cid Young", "email": "cid@example.com",
              "address": { "city": "Lakeview", "geo": { "lat": "0", "lng": "3" } } },
            { "id": 2, "name": "Anna Young", "address": { "city": "Hill", "geo": { "lat": "0", "lng": "1" } } },
            { "id": 3, "name": "Bob Annex", "address": { "city": "Lake City", "geo": { "lat": "0", "lng": "2" } } }
        ]))
        .unwrap()
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(Theme::default());
        let parser = state.parser.clone();
        state.directory.load(users(), parser.as_ref());
        state.fetch = FetchStatus::Loaded { fetched_at: 0 };
        state
    }

    fn visible_ids(state: &AppState) -> Vec<i64> {
        state.visible().iter().map(|l| l.id()).collect()
    }

    #[test]
    fn view_is_derived_from_queries() {
        let mut state = loaded_state();
        assert_eq!(visible_ids(&state), vec![2, 3, 1]);

        state.query = Query::new("ann", "lake");
        assert_eq!(visible_ids(&state), vec![3]);
        assert_eq!(state.directory.working().len(), 3);
    }

    #[test]
    fn selection_wraps_and_clamps() {
        let mut state = loaded_state();
        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);

        state.selected_index = 2;
        state.query.city = "lake".to_string();
        state.clamp_selection();
        assert_eq!(state.selected_index, 1);
    }

    #[test]
    fn delete_targets_the_selected_visible_row() {
        let mut state = loaded_state();
        state.query.name = "young".to_string();
        state.selected_index = 1;
        assert!(state.delete_selected());
        assert_eq!(
            state.directory.working().iter().map(Listing::id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn distance_sort_is_gated_on_location() {
        let mut state = loaded_state();
        let before = state.directory.clone();
        assert!(!state.select_sort(SortMode::Distance));
        assert_eq!(state.directory, before);
        assert_eq!(state.sort_mode, Some(SortMode::FirstName));

        state.geolocation = Geolocation::fixed(Coordinates::new(0.0, 0.0));
        assert!(state.select_sort(SortMode::Distance));
        assert_eq!(visible_ids(&state), vec![2, 3, 1]);
        assert!(state.directory.is_annotated());
    }

    #[test]
    fn cycle_skips_unavailable_modes() {
        let mut state = loaded_state();
        state.sort_mode = Some(SortMode::City);
        assert!(state.cycle_sort());
        assert_eq!(state.sort_mode, Some(SortMode::FirstName));

        state.geolocation = Geolocation::fixed(Coordinates::new(0.0, 0.0));
        state.sort_mode = Some(SortMode::City);
        assert!(state.cycle_sort());
        assert_eq!(state.sort_mode, Some(SortMode::Distance));

        state.sort_mode = None;
        assert!(state.cycle_sort());
        assert_eq!(state.sort_mode, Some(SortMode::FirstName));
    }

    #[test]
    fn restore_only_when_something_was_removed() {
        let mut state = loaded_state();
        assert!(!state.restore());
        state.delete_selected();
        assert!(state.restore());
        assert_eq!(visible_ids(&state), vec![1, 2, 3]);
    }

    #[test]
    fn restore_clears_the_active_sort_marker() {
        let mut state = loaded_state();
        assert!(state.select_sort(SortMode::LastName));
        assert_eq!(state.sort_mode, Some(SortMode::LastName));
        state.delete_selected();

        assert!(state.restore());
        assert_eq!(state.sort_mode, None);
        assert_eq!(visible_ids(&state), vec![1, 2, 3]);
        let vm = state.compute_viewmodel(30, 120);
        assert!(vm.sort_bar.options.iter().all(|o| !o.active));

        assert!(state.select_sort(SortMode::LastName));
        let vm = state.compute_viewmodel(30, 120);
        let active: Vec<&str> = vm.sort_bar.options.iter().filter(|o| o.active).map(|o| o.label.as_str()).collect();
        assert_eq!(active, vec!["Last name, A-Z"]);
    }

    #[test]
    fn viewmodel_reflects_state() {
        let mut state = loaded_state();
        state.query.name = "ann".to_string();
        let vm = state.compute_viewmodel(30, 120);

        assert_eq!(vm.display_items.len(), 2);
        assert_eq!(vm.display_items[0].name, "Anna Young");
        assert_eq!(vm.display_items[0].name_highlights, vec![(0, 3)]);
        assert!(vm.display_items[0].is_selected);
        assert!(vm.header.title.contains("(2/3)"));
        assert_eq!(vm.sort_bar.options.len(), 3);
        assert!(!vm.show_distance);
        assert!(vm.empty_state.is_none());
        assert!(vm.details.is_some());

        state.query.name = "zzz".to_string();
        let vm = state.compute_viewmodel(30, 120);
        assert_eq!(vm.empty_state.map(|e| e.message), Some("No matches".to_string()));
    }

    #[test]
    fn viewmodel_windows_around_selection() {
        let mut state = loaded_state();
        state.selected_index = 2;
        let vm = state.compute_viewmodel(CHROME_ROWS + 2, 120);
        assert_eq!(vm.display_items.len(), 2);
        assert!(vm.display_items[vm.selected_index].is_selected);
    }

    #[test]
    fn empty_state_follows_fetch_status() {
        let mut state = AppState::new(Theme::default());
        state.fetch = FetchStatus::Failed;
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.empty_state.map(|e| e.message), Some("Directory unavailable".to_string()));
    }
}
