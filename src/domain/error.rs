//! Error types for the Yellow Page plugin.
//!
//! This module defines the centralized error type [`YellowPageError`] and a type
//! alias [`Result`] used throughout the crate. Nothing in the plugin treats an
//! error as fatal: failures are logged at the shim boundary and the UI degrades
//! to an empty or stale listing.

use thiserror::Error;

/// The main error type for Yellow Page operations.
///
/// # Examples
///
/// ```
/// use yellowpage::YellowPageError;
///
/// fn fetch() -> Result<(), YellowPageError> {
///     Err(YellowPageError::Fetch("HTTP 503".to_string()))
/// }
///
/// assert!(fetch().is_err());
/// ```
#[derive(Debug, Error)]
pub enum YellowPageError {
    /// The directory endpoint could not be reached or answered with a
    /// non-success status.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A payload (directory listing, location lookup, worker IPC) was not valid
    /// JSON or did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The directory payload decoded but violates a record invariant, such as
    /// duplicate ids.
    #[error("Invalid directory: {0}")]
    InvalidDirectory(String),

    /// The current position could not be acquired (permission denied, lookup
    /// refused, malformed response).
    #[error("Geolocation error: {0}")]
    Geolocation(String),

    /// Distance sorting was requested without a known origin.
    ///
    /// Callers are expected to only offer the distance mode once the
    /// geolocation provider reports availability.
    #[error("distance sort requested before a location was acquired")]
    DistanceUnavailable,

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for Yellow Page operations.
pub type Result<T> = std::result::Result<T, YellowPageError>;
