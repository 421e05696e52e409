//! Current-location acquisition.
//!
//! The viewer's position is requested once per plugin lifetime. [`Geolocation`]
//! tracks that single acquisition: [`Geolocation::begin`] only returns `true`
//! the first time, and completions are accepted only while the request is
//! pending, so a late or duplicated answer can never overwrite a recorded
//! result.
//!
//! Inside Zellij there is no browser location API, so the position comes
//! either from static `latitude`/`longitude` configuration or from an IP
//! geolocation lookup whose body is parsed by [`parse_location_response`].

use crate::domain::error::{Result, YellowPageError};
use crate::domain::Coordinates;
use serde::Deserialize;

/// Lifecycle of the one-shot location request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    /// Nothing requested yet.
    Idle,
    /// Request in flight.
    Pending,
    /// Position acquired; distance sorting is available.
    Available(Coordinates),
    /// Refused, unsupported, or failed. The reason is only logged.
    Unavailable(String),
}

/// One-shot geolocation provider state.
#[derive(Debug, Clone, PartialEq)]
pub struct Geolocation {
    status: LocationStatus,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Geolocation {
    /// Provider that has not been asked for a position yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: LocationStatus::Idle,
        }
    }

    /// Provider that already knows its position (configured coordinates).
    #[must_use]
    pub const fn fixed(origin: Coordinates) -> Self {
        Self {
            status: LocationStatus::Available(origin),
        }
    }

    /// Marks the request as started.
    ///
    /// # Returns
    ///
    /// `true` only on the first call from `Idle`; every later call is a no-op
    /// returning `false`, so callers issue at most one platform request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use yellowpage::infrastructure::{Geolocation, LocationStatus};
    ///
    /// let mut geolocation = Geolocation::new();
    /// assert!(geolocation.begin());
    /// assert!(!geolocation.begin());
    /// assert_eq!(geolocation.status(), &LocationStatus::Pending);
    /// assert!(!geolocation.distance_available());
    /// ```
    pub fn begin(&mut self) -> bool {
        if self.status == LocationStatus::Idle {
            self.status = LocationStatus::Pending;
            tracing::debug!("location request started");
            true
        } else {
            false
        }
    }

    /// Records a successful acquisition. Ignored unless a request is pending.
    ///
    /// # Parameters
    ///
    /// * `origin` - The acquired position
    ///
    /// # Returns
    ///
    /// `true` if the position was recorded, `false` for a stale completion.
    pub fn resolve(&mut self, origin: Coordinates) -> bool {
        if self.status != LocationStatus::Pending {
            tracing::debug!(status = ?self.status, "dropping stale location result");
            return false;
        }
        tracing::debug!(lat = origin.lat, lng = origin.lng, "location acquired");
        self.status = LocationStatus::Available(origin);
        true
    }

    /// Records a refusal or failure. Ignored once a result has been recorded;
    /// a failure before any request was made still marks the provider
    /// unavailable.
    ///
    /// # Parameters
    ///
    /// * `reason` - Why no position is available; only logged
    ///
    /// # Returns
    ///
    /// `true` if the provider became unavailable, `false` if a result was
    /// already recorded.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        match self.status {
            LocationStatus::Idle | LocationStatus::Pending => {
                let reason = reason.into();
                tracing::debug!(reason = %reason, "location unavailable");
                self.status = LocationStatus::Unavailable(reason);
                true
            }
            LocationStatus::Available(_) | LocationStatus::Unavailable(_) => false,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &LocationStatus {
        &self.status
    }

    /// The acquired position, if any.
    #[must_use]
    pub const fn origin(&self) -> Option<Coordinates> {
        match self.status {
            LocationStatus::Available(origin) => Some(origin),
            _ => None,
        }
    }

    /// Whether the distance sort may be offered.
    ///
    /// `false` while idle or pending, and for the rest of the session after a
    /// failure.
    #[must_use]
    pub const fn distance_available(&self) -> bool {
        matches!(self.status, LocationStatus::Available(_))
    }
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "lng", alias = "longitude")]
    lon: Option<f64>,
}

/// Extracts coordinates from an IP geolocation response body.
///
/// Accepts `lat`/`lon`, `lat`/`lng`, or `latitude`/`longitude` fields. A
/// `status` other than `"success"` is treated as a refusal.
///
/// # Errors
///
/// Returns [`YellowPageError::Decode`] for malformed JSON and
/// [`YellowPageError::Geolocation`] for refusals or missing fields.
///
/// ```
/// use yellowpage::infrastructure::geolocation::parse_location_response;
///
/// let origin = parse_location_response(r#"{"status":"success","lat":52.37,"lon":4.89}"#).unwrap();
/// assert_eq!(origin.lat, 52.37);
/// assert!(parse_location_response(r#"{"status":"fail","message":"private range"}"#).is_err());
/// ```
pub fn parse_location_response(body: &str) -> Result<Coordinates> {
    let response: LocationResponse = serde_json::from_str(body)?;

    if let Some(status) = response.status.as_deref() {
        if status != "success" {
            return Err(YellowPageError::Geolocation(format!(
                "lookup refused: {}",
                response.message.as_deref().unwrap_or(status)
            )));
        }
    }

    match (response.lat, response.lon) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Ok(Coordinates::new(lat, lng)),
        _ => Err(YellowPageError::Geolocation(
            "response carried no coordinates".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_one_shot() {
        let mut geo = Geolocation::new();
        assert!(geo.begin());
        assert!(!geo.begin());
        assert_eq!(geo.status(), &LocationStatus::Pending);
        assert!(!geo.distance_available());
    }

    #[test]
    fn resolve_enables_distance() {
        let mut geo = Geolocation::new();
        geo.begin();
        assert!(geo.resolve(Coordinates::new(1.0, 2.0)));
        assert!(geo.distance_available());
        assert_eq!(geo.origin(), Some(Coordinates::new(1.0, 2.0)));
        assert!(!geo.begin());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut geo = Geolocation::new();
        assert!(!geo.resolve(Coordinates::new(1.0, 2.0)));
        assert_eq!(geo.status(), &LocationStatus::Idle);

        geo.begin();
        geo.fail("denied");
        assert!(!geo.resolve(Coordinates::new(1.0, 2.0)));
        assert!(!geo.distance_available());

        let mut fixed = Geolocation::fixed(Coordinates::new(3.0, 4.0));
        assert!(!fixed.fail("late failure"));
        assert!(fixed.distance_available());
    }

    #[test]
    fn failure_without_request_marks_unavailable() {
        let mut geo = Geolocation::new();
        assert!(geo.fail("permission denied"));
        assert!(!geo.begin());
        assert_eq!(geo.origin(), None);
    }

    #[test]
    fn parses_common_lookup_shapes() {
        let a = parse_location_response(r#"{"status":"success","lat":1.5,"lon":-2.5}"#).unwrap();
        assert_eq!(a, Coordinates::new(1.5, -2.5));
        let b = parse_location_response(r#"{"latitude":10,"longitude":20}"#).unwrap();
        assert_eq!(b, Coordinates::new(10.0, 20.0));
        let c = parse_location_response(r#"{"lat":3,"lng":4}"#).unwrap();
        assert_eq!(c, Coordinates::new(3.0, 4.0));
    }

    #[test]
    fn rejects_refusals_and_garbage() {
        assert!(matches!(
            parse_location_response(r#"{"status":"fail","message":"reserved range"}"#),
            Err(YellowPageError::Geolocation(_))
        ));
        assert!(matches!(
            parse_location_response(r#"{"status":"success"}"#),
            Err(YellowPageError::Geolocation(_))
        ));
        assert!(matches!(
            parse_location_response("not json"),
            Err(YellowPageError::Decode(_))
        ));
    }
}
