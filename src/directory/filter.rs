//! Name/city query filtering.
//!
//! Queries are transient input state. They are never applied to the stored
//! lists; instead [`derive_view`] is called on every render against the
//! current working list, so the visible rows can never go stale.

use crate::domain::{Listing, UserRecord};

/// The two free-text search fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Case-insensitive substring of the full name.
    pub name: String,
    /// Case-insensitive substring of the address city.
    pub city: String,
}

impl Query {
    #[must_use]
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
        }
    }

    /// True when neither field holds any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.city.is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.city.clear();
    }
}

/// Decides whether `user` satisfies `query`.
///
/// Empty fields place no constraint; when both fields are set, both must
/// match.
///
/// ```
/// use yellowpage::directory::{matches, Query};
/// # use yellowpage::domain::UserRecord;
/// # let user: UserRecord = serde_json::from_str(
/// #     r#"{"id": 1, "name": "Anna Bell", "address": {"city": "Lakeview"}}"#).unwrap();
/// assert!(matches(&Query::new("ann", "lake"), &user));
/// assert!(!matches(&Query::new("ann", "hill"), &user));
/// ```
#[must_use]
pub fn matches(query: &Query, user: &UserRecord) -> bool {
    contains_ignore_case(&user.name, &query.name)
        && contains_ignore_case(&user.address.city, &query.city)
}

/// Returns the rows of `listings` visible under `query`, in working-list order.
///
/// With an empty query the predicate is skipped and every row is returned.
#[must_use]
pub fn derive_view<'a>(listings: &'a [Listing], query: &Query) -> Vec<&'a Listing> {
    if query.is_empty() {
        return listings.iter().collect();
    }
    listings.iter().filter(|l| matches(query, &l.user)).collect()
}

/// Character range `(start, end)` of the first case-insensitive occurrence
/// of `needle` in `text`, for match highlighting.
///
/// Returns `None` for an empty needle, no match, or when lowercasing changes
/// the character count (the indices would not line up with the display text).
#[must_use]
pub fn match_range(text: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }

    let lowered: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    if lowered.len() != text.chars().count() {
        return None;
    }
    let pattern: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();

    lowered
        .windows(pattern.len())
        .position(|w| w == pattern.as_slice())
        .map(|start| (start, start + pattern.len()))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
