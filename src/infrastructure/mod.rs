//! Infrastructure layer: platform capabilities and sandbox paths.
//!
//! - [`geolocation`]: one-shot current-location acquisition and lookup parsing
//! - [`paths`]: `/host` sandbox path helpers

pub mod geolocation;
pub mod paths;

pub use geolocation::{parse_location_response, Geolocation, LocationStatus};
pub use paths::{expand_tilde, get_data_dir};
