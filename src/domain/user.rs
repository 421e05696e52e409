//! Directory record model.
//!
//! [`UserRecord`] mirrors the JSON shape served by the directory endpoint.
//! Records are immutable once fetched; the only derived data, the distance
//! from the viewer, lives on the [`Listing`] wrapper so that annotating a
//! record never has to rebuild it field by field.

use crate::domain::error::{Result, YellowPageError};
use crate::domain::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Session-stable identifier of a directory entry.
pub type UserId = i64;

/// A single person in the directory, as fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

/// Postal address with optional coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub geo: Option<Coordinates>,
}

/// Employer details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "catchPhrase")]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}

impl UserRecord {
    /// One-line summary of employer and full address.
    ///
    /// ```
    /// # use yellowpage::domain::{UserRecord, Address, Company};
    /// let user = UserRecord {
    ///     id: 1,
    ///     name: "Leanne Graham".into(),
    ///     username: String::new(),
    ///     email: String::new(),
    ///     phone: String::new(),
    ///     website: String::new(),
    ///     address: Address {
    ///         street: "Kulas Light".into(),
    ///         suite: "Apt. 556".into(),
    ///         city: "Gwenborough".into(),
    ///         zipcode: "92998-3874".into(),
    ///         geo: None,
    ///     },
    ///     company: Company { name: "Romaguera-Crona".into(), ..Default::default() },
    /// };
    /// assert_eq!(
    ///     user.info_line(),
    ///     "Romaguera-Crona: Kulas Light, Apt. 556, Gwenborough, 92998-3874"
    /// );
    /// ```
    #[must_use]
    pub fn info_line(&self) -> String {
        let a = &self.address;
        format!(
            "{}: {}, {}, {}, {}",
            self.company.name, a.street, a.suite, a.city, a.zipcode
        )
    }

    /// Distance in meters from `origin`, or NaN when the record has no
    /// coordinates.
    #[must_use]
    pub fn distance_from(&self, origin: &Coordinates) -> f64 {
        self.address
            .geo
            .map_or(f64::NAN, |geo| origin.distance_to(&geo))
    }
}

/// A record as it appears in the working list.
///
/// `distance` is populated by the distance sort and serialises as a plain
/// numeric field next to the record's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub user: UserRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Listing {
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.user.id
    }

    /// Returns a copy annotated with the distance from `origin`.
    #[must_use]
    pub fn with_distance_from(&self, origin: &Coordinates) -> Self {
        Self {
            user: self.user.clone(),
            distance: Some(self.user.distance_from(origin)),
        }
    }
}

impl From<UserRecord> for Listing {
    fn from(user: UserRecord) -> Self {
        Self { user, distance: None }
    }
}

/// Decodes the directory endpoint's JSON array, preserving fetch order.
///
/// # Errors
///
/// Returns [`YellowPageError::Decode`] for malformed JSON and
/// [`YellowPageError::InvalidDirectory`] when two records share an id.
pub fn decode_directory(body: &str) -> Result<Vec<UserRecord>> {
    let users: Vec<UserRecord> = serde_json::from_str(body)?;

    let mut seen = HashSet::with_capacity(users.len());
    if let Some(dup) = users.iter().find(|u| !seen.insert(u.id)) {
        return Err(YellowPageError::InvalidDirectory(format!(
            "duplicate id {}",
            dup.id
        )));
    }

    tracing::debug!(user_count = users.len(), "directory decoded");
    Ok(users)
}
