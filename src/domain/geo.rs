//! Geographic coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula on a sphere of the Earth's
//! mean radius. NaN inputs propagate to a NaN distance rather than failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the globe in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north.
    #[serde(deserialize_with = "degrees")]
    pub lat: f64,
    /// Longitude, positive east.
    #[serde(deserialize_with = "degrees")]
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Distance in meters from `self` to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(self, other)
    }
}

/// Great-circle distance in meters between two coordinates.
///
/// # Example
///
/// ```
/// use yellowpage::domain::geo::{haversine_distance, Coordinates};
///
/// let d = haversine_distance(&Coordinates::new(0.0, 0.0), &Coordinates::new(0.0, 1.0));
/// assert!((d - 111_195.0).abs() < 50.0);
/// ```
#[must_use]
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Formats a distance for display: meters below one kilometer, otherwise
/// kilometers with one decimal.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters.is_nan() {
        "?".to_string()
    } else if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Accepts a coordinate encoded either as a JSON number or as a decimal
/// string ("-37.3159"), which is how the directory endpoint ships them.
fn degrees<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(deserializer)? {
        Degrees::Number(value) => Ok(value),
        Degrees::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {text:?}: {e}"))),
    }
}
