//! The Yellow Page: a Zellij plugin for browsing a people directory.
//!
//! The plugin fetches a list of people once, then lets the user:
//! - filter by name and city (case-insensitive substring, both must match)
//! - sort by first name, last name, city, or distance from their location
//! - delete rows from the displayed list and restore the full list
//!
//! Distance sorting only appears once the viewer's position is known, either
//! from configuration or from a single IP geolocation lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point, host calls
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, actions, view model              │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Directory     │   │ Worker Layer  │
//! │ (ui/)         │   │ (directory/)  │   │ (worker/)     │
//! │ - Rendering   │   │ - Store       │   │ - Payload     │
//! │ - Theming     │   │ - Filter      │   │   decoding    │
//! │ - Components  │   │ - Sort        │   │ - IPC types   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Geolocation, sandbox paths (infrastructure/)     │
//! │  - Records, distance, names, errors (domain/)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + OpenTelemetry, file-based OTLP export  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/yellowpage.wasm" {
//!         directory_url "https://jsonplaceholder.typicode.com/users"
//!         latitude "52.52"
//!         longitude "13.405"
//!         theme "yellow-page-dark"
//!         trace_level "yellowpage=debug"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. `main.rs` parses the configuration, initializes tracing, builds the
//!    `AppState`, requests web access, and subscribes to events.
//! 2. Once permission is granted the handler emits the directory fetch and,
//!    unless coordinates were configured, the location lookup.
//! 3. The directory body is decoded on the worker thread; the decoded records
//!    become the canonical list and a first-name-sorted working list.
//! 4. Each render derives the filtered view from the working list.
//!
//! # Example
//!
//! ```rust
//! use yellowpage::{handle_event, initialize, Config, Event};
//! use yellowpage::worker::{DirectoryWorker, WorkerMessage};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert_eq!(actions.len(), 2);
//!
//! handle_event(&mut state, &Event::DirectoryFetched {
//!     status: 200,
//!     body: r#"[{"id": 1, "name": "Leanne Graham"}]"#.to_string(),
//! })?;
//! let mut worker = DirectoryWorker::default();
//! let response = worker.handle_message(WorkerMessage::decode_directory(
//!     r#"[{"id": 1, "name": "Leanne Graham"}]"#.to_string(),
//! ));
//! handle_event(&mut state, &Event::WorkerResponse(response))?;
//! assert_eq!(state.visible().len(), 1);
//! # Ok::<(), yellowpage::YellowPageError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod directory;
pub mod domain;
pub mod infrastructure;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, QueryField};
pub use directory::SortMode;
pub use domain::{Coordinates, Listing, Result, UserRecord, YellowPageError};
pub use ui::Theme;

use app::state::{DEFAULT_DIRECTORY_URL, DEFAULT_GEOLOCATION_URL};
use app::Endpoints;
use infrastructure::{expand_tilde, Geolocation};
use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Endpoint returning the directory as a JSON array.
    pub directory_url: String,

    /// IP geolocation endpoint, used when no coordinates are configured.
    pub geolocation_url: String,

    /// Fixed viewer position from `latitude`/`longitude`. Skips the lookup.
    pub location: Option<Coordinates>,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file; `~` maps to the sandbox home.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            location: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// - `directory_url`, `geolocation_url`: blank values fall back to defaults
    /// - `latitude` + `longitude`: both must parse and be in range, otherwise
    ///   the position is looked up at runtime
    /// - `theme`, `theme_file`, `trace_level`: taken as-is
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use yellowpage::{Config, Coordinates};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("latitude".to_string(), "52.52".to_string());
    /// map.insert("longitude".to_string(), "13.405".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.location, Some(Coordinates::new(52.52, 13.405)));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let url = |key: &str, default: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Self {
            directory_url: url("directory_url", DEFAULT_DIRECTORY_URL),
            geolocation_url: url("geolocation_url", DEFAULT_GEOLOCATION_URL),
            location: parse_location(config.get("latitude"), config.get("longitude")),
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

fn parse_location(latitude: Option<&String>, longitude: Option<&String>) -> Option<Coordinates> {
    let parse = |value: Option<&String>, limit: f64| {
        value
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && v.abs() <= limit)
    };

    match (parse(latitude, 90.0), parse(longitude, 180.0)) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => {
            if latitude.is_some() || longitude.is_some() {
                tracing::warn!(?latitude, ?longitude, "ignoring invalid configured location");
            }
            None
        }
    }
}

fn load_theme(config: &Config) -> Theme {
    if let Some(theme_file) = &config.theme_file {
        return Theme::from_file(expand_tilde(theme_file)).unwrap_or_else(|e| {
            tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
            Theme::default()
        });
    }

    config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
        Theme::from_name(theme_name).unwrap_or_else(|| {
            tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
            Theme::default()
        })
    })
}

/// Builds the initial `AppState` from configuration.
///
/// The directory starts empty; nothing is fetched until the host grants web
/// access.
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(directory_url = %config.directory_url, fixed_location = config.location.is_some(), "initializing yellowpage plugin");

    let mut state = AppState::new(load_theme(config));
    state.endpoints = Endpoints {
        directory_url: config.directory_url.clone(),
        geolocation_url: config.geolocation_url.clone(),
    };
    if let Some(origin) = config.location {
        state.geolocation = Geolocation::fixed(origin);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn defaults_when_unconfigured() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config, Config::default());
        assert_eq!(config.directory_url, "https://jsonplaceholder.typicode.com/users");
    }

    #[test]
    fn blank_urls_fall_back() {
        let config = Config::from_zellij(&map(&[("directory_url", "  "), ("geolocation_url", "https://geo.test/")]));
        assert_eq!(config.directory_url, DEFAULT_DIRECTORY_URL);
        assert_eq!(config.geolocation_url, "https://geo.test/");
    }

    #[test]
    fn location_needs_both_valid_coordinates() {
        assert!(Config::from_zellij(&map(&[("latitude", "10")])).location.is_none());
        assert!(Config::from_zellij(&map(&[("latitude", "91"), ("longitude", "0")])).location.is_none());
        assert!(Config::from_zellij(&map(&[("latitude", "x"), ("longitude", "0")])).location.is_none());
        assert_eq!(
            Config::from_zellij(&map(&[("latitude", "-33.87"), ("longitude", "151.21")])).location,
            Some(Coordinates::new(-33.87, 151.21))
        );
    }

    #[test]
    fn initialize_applies_configuration() {
        let config = Config::from_zellij(&map(&[
            ("directory_url", "https://people.test/users"),
            ("latitude", "1"),
            ("longitude", "2"),
            ("theme", "yellow-page-dark"),
        ]));
        let state = initialize(&config);

        assert_eq!(state.endpoints.directory_url, "https://people.test/users");
        assert!(state.geolocation.distance_available());
        assert_eq!(state.theme.name, "yellow-page-dark");
    }

    #[test]
    fn unknown_theme_uses_default() {
        let state = initialize(&Config::from_zellij(&map(&[("theme", "neon")])));
        assert_eq!(state.theme, Theme::default());
    }
}
