//! Domain layer for the Yellow Page plugin.
//!
//! Core record types and pure computations, independent of Zellij APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`user`]: Directory records, the distance-annotated [`Listing`], payload decoding
//! - [`geo`]: Coordinates and haversine distance
//! - [`names`]: First/last name key extraction

pub mod error;
pub mod geo;
pub mod names;
pub mod user;

pub use error::{Result, YellowPageError};
pub use geo::{haversine_distance, Coordinates};
pub use names::{HumanNameParser, NameParser, NamePart};
pub use user::{decode_directory, Address, Company, Listing, UserId, UserRecord};
