//! Zellij plugin wrapper and entry point.
//!
//! The thin layer between the `yellowpage` library and the Zellij host. Every
//! host call (permissions, web requests, worker IPC, hiding the pane) happens
//! here; the library only sees [`Event`]s and returns [`Action`]s.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │     Zellij Main Thread       │
//! │  ┌────────────────────────┐  │
//! │  │  State (plugin)        │  │  ← UI state, event handling
//! │  └────────────────────────┘  │
//! │        │ IPC       ▲         │
//! │        ▼           │         │
//! │  ┌────────────────────────┐  │
//! │  │  YellowPageWorker      │  │  ← directory payload decoding
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `Key` → navigation, query, sort, delete and restore events
//! - `WebRequestResult` → `DirectoryFetched` or `LocationFetched`, by the
//!   `request` entry of the request context
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `PermissionRequestResult` → `Event::PermissionsResult`
//!
//! # Keybindings
//!
//! Global:
//! - `Ctrl+n` / `Down`: Move down
//! - `Ctrl+p` / `Up`: Move up
//!
//! In normal mode:
//! - `j` / `k`: Move down / up
//! - `/` or `n`: Type into the name query
//! - `c`: Type into the city query
//! - `1`-`4`: Sort by first name, last name, city, distance
//! - `s`: Next sort mode
//! - `d` / `Delete`: Delete the selected row
//! - `r`: Restore deleted rows
//! - `Esc`: Clear both queries
//! - `q`: Close plugin
//!
//! While typing a query:
//! - `Tab`: Switch between name and city
//! - `Enter`: Back to the results, keeping the queries
//! - `Esc`: Clear both queries

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use yellowpage::worker::{DirectoryWorker, WorkerMessage, WorkerResponse};
use yellowpage::{handle_event, Action, Config, Event, InputMode, QueryField, SortMode};

/// Name used for worker IPC in both directions.
const WORKER_NAME: &str = "yellowpage";

/// Context key identifying which request a web result answers.
const REQUEST_KEY: &str = "request";
const DIRECTORY_REQUEST: &str = "directory";
const LOCATION_REQUEST: &str = "geolocation";

register_plugin!(State);
register_worker!(YellowPageWorker, yellowpage_worker, YELLOWPAGE_WORKER);

/// Worker thread entry point; decodes payloads and posts the response back.
#[derive(Default, Serialize, Deserialize)]
struct YellowPageWorker {
    #[serde(skip)]
    inner: DirectoryWorker,
}

impl<'de> ZellijWorker<'de> for YellowPageWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if message != WORKER_NAME {
            return;
        }

        post_message_to_plugin(PluginMessage {
            worker_name: None,
            name: WORKER_NAME.to_string(),
            payload: self.inner.respond(&payload),
        });
    }
}

/// Plugin state wrapper around the library's `AppState`.
struct State {
    app: yellowpage::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: yellowpage::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, initializes tracing and state, requests web
    /// access, and subscribes to events. Nothing is fetched until the
    /// permission result arrives.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        yellowpage::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();

        tracing::debug!(
            directory_url = %config.directory_url,
            fixed_location = config.location.is_some(),
            "parsed configuration"
        );
        self.app = yellowpage::initialize(&config);

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let _guard =
            tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name).entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_result_event(status, &body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Event::PermissionsResult {
                granted: matches!(status, PermissionStatus::Granted),
            },
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for action in actions {
                    Self::execute_action(&action);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        yellowpage::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events for the current mode.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        match self.app.input_mode {
            InputMode::Query(_) => Self::map_query_key(key),
            InputMode::Normal => Self::map_normal_key(key),
        }
    }

    fn map_query_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Tab => Event::SwitchQueryField,
            BareKey::Enter => Event::FocusResults,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_normal_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Char('/' | 'n') | BareKey::Tab => Event::FocusQuery(QueryField::Name),
            BareKey::Char('c') => Event::FocusQuery(QueryField::City),
            BareKey::Char('s') => Event::CycleSort,
            BareKey::Char('d') | BareKey::Delete => Event::DeleteSelected,
            BareKey::Char('r') => Event::Restore,
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Esc => Event::Escape,
            BareKey::Char(c) => Event::SelectSort(SortMode::from_shortcut(c)?),
            _ => return None,
        })
    }

    /// Maps worker responses to application events.
    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Routes a web request result by the context it was issued with.
    fn map_web_result_event(status: u16, body: &[u8], context: &BTreeMap<String, String>) -> Option<Event> {
        let body = String::from_utf8_lossy(body).into_owned();
        tracing::debug!(status = status, body_len = body.len(), context = ?context, "web request result");

        match context.get(REQUEST_KEY).map(String::as_str) {
            Some(DIRECTORY_REQUEST) => Some(Event::DirectoryFetched { status, body }),
            Some(LOCATION_REQUEST) => Some(Event::LocationFetched { status, body }),
            _ => {
                tracing::debug!("ignoring web request result without a known context");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    fn get(url: &str, request: &str) {
        let context = BTreeMap::from([(REQUEST_KEY.to_string(), request.to_string())]);
        web_request(url, HttpVerb::Get, BTreeMap::new(), vec![], context);
    }

    /// Translates library actions to Zellij API calls.
    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::FetchDirectory { url } => Self::get(url, DIRECTORY_REQUEST),
            Action::RequestLocation { url } => Self::get(url, LOCATION_REQUEST),
            Action::PostToWorker(message) => Self::post_worker_message(message),
        }
    }
}
