//! Sort engine for the working list.
//!
//! Every sort returns a fresh, fully reordered copy; the input is never
//! sorted in place. All modes use a stable sort, so rows with equal keys keep
//! their relative order.

use crate::domain::error::{Result, YellowPageError};
use crate::domain::{Coordinates, Listing, NameParser, NamePart};
use std::cmp::Ordering;

/// The key a working list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    FirstName,
    LastName,
    City,
    /// Ascending distance from the viewer; only selectable once a location
    /// has been acquired.
    Distance,
}

impl SortMode {
    /// All modes in menu order.
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::City, Self::Distance];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name, A-Z",
            Self::LastName => "Last name, A-Z",
            Self::City => "City, A-Z",
            Self::Distance => "Distance",
        }
    }

    /// Number key that selects this mode in the sort bar.
    #[must_use]
    pub const fn shortcut(self) -> char {
        match self {
            Self::FirstName => '1',
            Self::LastName => '2',
            Self::City => '3',
            Self::Distance => '4',
        }
    }

    #[must_use]
    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.shortcut() == c)
    }

    #[must_use]
    pub const fn requires_location(self) -> bool {
        matches!(self, Self::Distance)
    }

    /// Modes the user may pick given whether a location is known.
    #[must_use]
    pub fn available(distance_available: bool) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|m| distance_available || !m.requires_location())
            .collect()
    }
}

/// Returns `listings` reordered by `mode`.
///
/// `Distance` recomputes the distance of every row from `origin` and attaches
/// it, so the output is uniformly annotated. Other modes carry any existing
/// annotation through unchanged.
///
/// # Errors
///
/// Returns [`YellowPageError::DistanceUnavailable`] for `Distance` without an
/// origin; the input is left untouched.
pub fn sort_listings(
    listings: &[Listing],
    mode: SortMode,
    origin: Option<Coordinates>,
    parser: &dyn NameParser,
) -> Result<Vec<Listing>> {
    let _span = tracing::debug_span!("sort_listings", mode = ?mode, count = listings.len()).entered();

    let sorted = match mode {
        SortMode::FirstName => sort_by_name(listings, NamePart::First, parser),
        SortMode::LastName => sort_by_name(listings, NamePart::Last, parser),
        SortMode::City => {
            let mut sorted = listings.to_vec();
            sorted.sort_by(|a, b| a.user.address.city.cmp(&b.user.address.city));
            sorted
        }
        SortMode::Distance => {
            let origin = origin.ok_or(YellowPageError::DistanceUnavailable)?;
            let mut sorted: Vec<Listing> = listings
                .iter()
                .map(|l| l.with_distance_from(&origin))
                .collect();
            sorted.sort_by(|a, b| compare_distance(a.distance, b.distance));
            sorted
        }
    };

    Ok(sorted)
}

/// Sorts by an extracted name token, parsing each name once.
fn sort_by_name(listings: &[Listing], part: NamePart, parser: &dyn NameParser) -> Vec<Listing> {
    let mut keyed: Vec<(String, Listing)> = listings
        .iter()
        .map(|l| (parser.parse(&l.user.name, part), l.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, l)| l).collect()
}

/// NaN (no coordinates) orders after every real distance.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NAN);
    let b = b.unwrap_or(f64::NAN);
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HumanNameParser, UserRecord};

    fn listing(id: i64, name: &str, city: &str, geo: Option<(f64, f64)>) -> Listing {
        let mut user: UserRecord = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "address": { "city": city }
        }))
        .unwrap();
        user.address.geo = geo.map(|(lat, lng)| Coordinates::new(lat, lng));
        user.into()
    }

    fn names(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.user.name.as_str()).collect()
    }

    #[test]
    fn first_name_sort_and_idempotence() {
        let input = vec![
            listing(1, "Bob Young", "", None),
            listing(2, "Amy Young", "", None),
            listing(3, "Cid Young", "", None),
        ];
        let once = sort_listings(&input, SortMode::FirstName, None, &HumanNameParser).unwrap();
        assert_eq!(names(&once), vec!["Amy Young", "Bob Young", "Cid Young"]);

        let twice = sort_listings(&once, SortMode::FirstName, None, &HumanNameParser).unwrap();
        assert_eq!(once, twice);
        assert_eq!(names(&input), vec!["Bob Young", "Amy Young", "Cid Young"]);
    }

    #[test]
    fn last_name_sort_is_stable_for_ties() {
        let input = vec![
            listing(1, "Zed Young", "", None),
            listing(2, "Amy Adams", "", None),
            listing(3, "Bob Young", "", None),
        ];
        let sorted = sort_listings(&input, SortMode::LastName, None, &HumanNameParser).unwrap();
        assert_eq!(names(&sorted), vec!["Amy Adams", "Zed Young", "Bob Young"]);
    }

    #[test]
    fn city_sort_is_case_sensitive() {
        let input = vec![
            listing(1, "A", "bath", None),
            listing(2, "B", "York", None),
            listing(3, "C", "Aberdeen", None),
        ];
        let sorted = sort_listings(&input, SortMode::City, None, &HumanNameParser).unwrap();
        let cities: Vec<&str> = sorted.iter().map(|l| l.user.address.city.as_str()).collect();
        assert_eq!(cities, vec!["Aberdeen", "York", "bath"]);
    }

    #[test]
    fn distance_sort_annotates_every_row() {
        let input = vec![
            listing(1, "Far", "", Some((0.0, 10.0))),
            listing(2, "Unknown", "", None),
            listing(3, "Near", "", Some((0.0, 1.0))),
            listing(4, "Here", "", Some((0.0, 0.0))),
        ];
        let origin = Some(Coordinates::new(0.0, 0.0));
        let sorted = sort_listings(&input, SortMode::Distance, origin, &HumanNameParser).unwrap();

        assert_eq!(names(&sorted), vec!["Here", "Near", "Far", "Unknown"]);
        assert!(sorted.iter().all(|l| l.distance.is_some()));
        assert!((sorted[1].distance.unwrap() - 111_195.0).abs() < 50.0);
        assert!(input.iter().all(|l| l.distance.is_none()));
    }

    #[test]
    fn distance_sort_without_origin_is_refused() {
        let input = vec![listing(1, "A", "", Some((1.0, 1.0)))];
        let result = sort_listings(&input, SortMode::Distance, None, &HumanNameParser);
        assert!(matches!(result, Err(YellowPageError::DistanceUnavailable)));
    }

    #[test]
    fn name_sort_keeps_existing_annotation() {
        let input = vec![
            listing(1, "Bea Far", "", Some((0.0, 5.0))),
            listing(2, "Al Near", "", Some((0.0, 1.0))),
        ];
        let by_distance =
            sort_listings(&input, SortMode::Distance, Some(Coordinates::new(0.0, 0.0)), &HumanNameParser)
                .unwrap();
        let by_name = sort_listings(&by_distance, SortMode::LastName, None, &HumanNameParser).unwrap();
        assert_eq!(names(&by_name), vec!["Bea Far", "Al Near"]);
        assert!(by_name.iter().all(|l| l.distance.is_some()));
    }

    #[test]
    fn availability_hides_distance() {
        assert_eq!(SortMode::available(false).len(), 3);
        assert!(!SortMode::available(false).contains(&SortMode::Distance));
        assert_eq!(SortMode::available(true), SortMode::ALL.to_vec());
        assert_eq!(SortMode::from_shortcut('4'), Some(SortMode::Distance));
        assert_eq!(SortMode::from_shortcut('9'), None);
    }
}
