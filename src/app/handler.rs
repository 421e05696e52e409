//! Event handling and state transition logic.
//!
//! Processes user input, web request results, and worker responses, turning
//! them into state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`
//! - **Query input**: `FocusQuery`, `SwitchQueryField`, `FocusResults`, `Char`, `Backspace`, `Escape`
//! - **List commands**: `SelectSort`, `CycleSort`, `DeleteSelected`, `Restore`
//! - **System**: `PermissionsResult`, `DirectoryFetched`, `LocationFetched`
//! - **Worker**: `WorkerResponse`
//!
//! # Example
//!
//! ```rust
//! use yellowpage::app::{handle_event, AppState, Event};
//! use yellowpage::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert!(should_render);
//! assert_eq!(actions.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::modes::{InputMode, QueryField};
use super::state::FetchStatus;
use crate::app::{Action, AppState};
use crate::directory::SortMode;
use crate::domain::error::{Result, YellowPageError};
use crate::infrastructure::parse_location_response;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, host callbacks, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the cursor down one row (wraps to top).
    KeyDown,
    /// Moves the cursor up one row (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,

    /// Starts typing into a query field.
    FocusQuery(QueryField),
    /// Moves typing focus to the other query field.
    SwitchQueryField,
    /// Leaves query input, keeping both queries applied.
    FocusResults,
    /// Appends a character to the focused query.
    Char(char),
    /// Removes the last character from the focused query.
    Backspace,
    /// Clears both queries and returns to normal mode.
    Escape,

    /// Sorts the working list by the given mode, if it is available.
    SelectSort(SortMode),
    /// Sorts by the next available mode.
    CycleSort,
    /// Removes the highlighted record from the working list.
    DeleteSelected,
    /// Resets the working list to the fetched records.
    Restore,

    /// Outcome of the web access permission request.
    ///
    /// A grant starts the directory fetch and the location lookup. A denial
    /// leaves the directory empty and location unavailable for the session.
    PermissionsResult {
        granted: bool,
    },

    /// Response to [`Action::FetchDirectory`].
    DirectoryFetched {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },

    /// Response to [`Action::RequestLocation`].
    LocationFetched {
        status: u16,
        body: String,
    },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Application state to mutate
/// * `event` - The event to process
///
/// # Returns
///
/// A tuple of `(should_render, actions)`:
/// - `should_render`: whether the UI changed and needs a re-render
/// - `actions`: side effects for the runtime, in execution order
///
/// # Event Flow
///
/// 1. `PermissionsResult { granted: true }` emits `FetchDirectory` and, unless
///    a location was configured, `RequestLocation`
/// 2. `DirectoryFetched` with a 2xx status emits `PostToWorker(DecodeDirectory)`
/// 3. `WorkerResponse(DirectoryDecoded)` installs the records, sorted by first
///    name
/// 4. `LocationFetched` resolves or fails the one-shot location, which decides
///    whether the distance sort is offered
///
/// List commands (`SelectSort`, `CycleSort`, `DeleteSelected`, `Restore`) are
/// ignored while a query field has focus.
///
/// # Errors
///
/// Currently never fails. Remote failures (bad status, undecodable payloads,
/// refused lookups) are logged and folded into the fetch and location states
/// rather than returned.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::FocusQuery(field) => {
            tracing::debug!(field = ?field, "focusing query field");
            state.input_mode = InputMode::Query(*field);
            Ok((true, vec![]))
        }
        Event::SwitchQueryField => {
            let InputMode::Query(field) = state.input_mode else {
                return Ok((false, vec![]));
            };
            state.input_mode = InputMode::Query(field.toggle());
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            let InputMode::Query(field) = state.input_mode else {
                return Ok((false, vec![]));
            };
            state.query_field_mut(field).push(*c);
            tracing::trace!(name = %state.query.name, city = %state.query.city, "query updated");
            state.clamp_selection();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            let InputMode::Query(field) = state.input_mode else {
                return Ok((false, vec![]));
            };
            if state.query_field_mut(field).pop().is_none() {
                return Ok((false, vec![]));
            }
            state.clamp_selection();
            Ok((true, vec![]))
        }
        Event::Escape => {
            tracing::debug!(name = %state.query.name, city = %state.query.city, "clearing queries");
            state.input_mode = InputMode::Normal;
            state.query.clear();
            state.clamp_selection();
            Ok((true, vec![]))
        }
        Event::SelectSort(mode) => {
            if !matches!(state.input_mode, InputMode::Normal) {
                return Ok((false, vec![]));
            }
            Ok((state.select_sort(*mode), vec![]))
        }
        Event::CycleSort => {
            if !matches!(state.input_mode, InputMode::Normal) {
                return Ok((false, vec![]));
            }
            Ok((state.cycle_sort(), vec![]))
        }
        Event::DeleteSelected => {
            if !matches!(state.input_mode, InputMode::Normal) {
                return Ok((false, vec![]));
            }
            let removed = state.delete_selected();
            if removed {
                tracing::debug!(remaining = state.directory.working().len(), "record deleted");
            }
            Ok((removed, vec![]))
        }
        Event::Restore => {
            if !matches!(state.input_mode, InputMode::Normal) {
                return Ok((false, vec![]));
            }
            let restored = state.restore();
            if restored {
                tracing::debug!(count = state.directory.working().len(), "directory restored");
            }
            Ok((restored, vec![]))
        }
        Event::PermissionsResult { granted } => {
            if !granted {
                tracing::error!("web access permission denied, directory cannot be fetched");
                if state.fetch == FetchStatus::Idle {
                    state.fetch = FetchStatus::Failed;
                }
                state.geolocation.fail("web access permission denied");
                return Ok((true, vec![]));
            }

            let mut actions = vec![];

            if state.fetch == FetchStatus::Idle {
                state.fetch = FetchStatus::Loading;
                tracing::debug!(url = %state.endpoints.directory_url, "fetching directory");
                actions.push(Action::FetchDirectory {
                    url: state.endpoints.directory_url.clone(),
                });
            }

            if state.geolocation.begin() {
                tracing::debug!(url = %state.endpoints.geolocation_url, "requesting location");
                actions.push(Action::RequestLocation {
                    url: state.endpoints.geolocation_url.clone(),
                });
            }

            Ok((true, actions))
        }
        Event::DirectoryFetched { status, body } => {
            if state.fetch != FetchStatus::Loading {
                tracing::debug!(status = status, fetch = ?state.fetch, "ignoring unexpected directory response");
                return Ok((false, vec![]));
            }

            if !is_success(*status) {
                let e = YellowPageError::Fetch(format!("HTTP {status} from {}", state.endpoints.directory_url));
                tracing::error!(error = %e, "directory fetch failed");
                state.fetch = FetchStatus::Failed;
                return Ok((true, vec![]));
            }

            tracing::debug!(status = status, body_len = body.len(), "directory fetched, decoding");
            Ok((false, vec![Action::PostToWorker(WorkerMessage::decode_directory(body.clone()))]))
        }
        Event::LocationFetched { status, body } => {
            let outcome = if is_success(*status) {
                parse_location_response(body)
            } else {
                Err(YellowPageError::Geolocation(format!("HTTP {status}")))
            };

            let changed = match outcome {
                Ok(origin) => {
                    tracing::debug!(lat = origin.lat, lng = origin.lng, "location resolved");
                    state.geolocation.resolve(origin)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "location unavailable, distance sort disabled");
                    state.geolocation.fail(e.to_string())
                }
            };
            Ok((changed, vec![]))
        }
        Event::WorkerResponse(response) => match response {
            WorkerResponse::DirectoryDecoded { users } => {
                let parser = state.parser.clone();
                if !state.directory.load(users.clone(), parser.as_ref()) {
                    tracing::debug!("directory already loaded, ignoring later payload");
                    return Ok((false, vec![]));
                }

                state.fetch = FetchStatus::Loaded {
                    fetched_at: chrono::Utc::now().timestamp(),
                };
                state.sort_mode = Some(SortMode::FirstName);
                state.selected_index = 0;
                tracing::debug!(user_count = users.len(), "directory loaded");
                Ok((true, vec![]))
            }
            WorkerResponse::Error { message } => {
                let e = YellowPageError::Worker(message.clone());
                tracing::error!(error = %e, "worker request failed");
                if state.fetch == FetchStatus::Loading {
                    state.fetch = FetchStatus::Failed;
                }
                Ok((true, vec![]))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::infrastructure::{Geolocation, LocationStatus};
    use crate::ui::Theme;

    const BODY: &str = r#"[
        {"id": 1, "name": "Cid Young", "address": {"city": "Lakeview", "geo": {"lat": "0", "lng": "3"}}},
        {"id": 2, "name": "Anna Young", "address": {"city": "Hill", "geo": {"lat": "0", "lng": "1"}}},
        {"id": 3, "name": "Bob Annex", "address": {"city": "Lake City", "geo": {"lat": "0", "lng": "2"}}}
    ]"#;

    fn send(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(Theme::default());
        send(&mut state, Event::PermissionsResult { granted: true });
        let users = crate::domain::decode_directory(BODY).unwrap();
        send(&mut state, Event::WorkerResponse(WorkerResponse::DirectoryDecoded { users }));
        state
    }

    fn working_ids(state: &AppState) -> Vec<i64> {
        state.directory.working().iter().map(|l| l.id()).collect()
    }

    #[test]
    fn permission_grant_starts_both_requests_once() {
        let mut state = AppState::new(Theme::default());
        let (render, actions) = send(&mut state, Event::PermissionsResult { granted: true });
        assert!(render);
        assert_eq!(
            actions,
            vec![
                Action::FetchDirectory { url: state.endpoints.directory_url.clone() },
                Action::RequestLocation { url: state.endpoints.geolocation_url.clone() },
            ]
        );
        assert_eq!(state.fetch, FetchStatus::Loading);
        assert_eq!(*state.geolocation.status(), LocationStatus::Pending);

        let (_, actions) = send(&mut state, Event::PermissionsResult { granted: true });
        assert!(actions.is_empty());
    }

    #[test]
    fn fixed_location_skips_the_lookup() {
        let mut state = AppState::new(Theme::default());
        state.geolocation = Geolocation::fixed(Coordinates::new(1.0, 2.0));
        let (_, actions) = send(&mut state, Event::PermissionsResult { granted: true });
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::FetchDirectory { .. }));
    }

    #[test]
    fn permission_denial_fails_fetch_and_location() {
        let mut state = AppState::new(Theme::default());
        let (render, actions) = send(&mut state, Event::PermissionsResult { granted: false });
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.fetch, FetchStatus::Failed);
        assert!(!state.geolocation.distance_available());
    }

    #[test]
    fn fetched_body_goes_to_worker() {
        let mut state = AppState::new(Theme::default());
        send(&mut state, Event::PermissionsResult { granted: true });
        let (_, actions) = send(
            &mut state,
            Event::DirectoryFetched { status: 200, body: BODY.to_string() },
        );
        assert_eq!(actions.len(), 1);
        let Action::PostToWorker(WorkerMessage::DecodeDirectory { body, .. }) = &actions[0] else {
            panic!("expected decode request, got {actions:?}");
        };
        assert_eq!(body, BODY);
    }

    #[test]
    fn bad_status_marks_fetch_failed() {
        let mut state = AppState::new(Theme::default());
        send(&mut state, Event::PermissionsResult { granted: true });
        let (render, actions) = send(
            &mut state,
            Event::DirectoryFetched { status: 503, body: String::new() },
        );
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.fetch, FetchStatus::Failed);
        assert!(state.directory.working().is_empty());
    }

    #[test]
    fn decoded_directory_loads_once_sorted_by_first_name() {
        let mut state = loaded();
        assert!(matches!(state.fetch, FetchStatus::Loaded { .. }));
        assert_eq!(working_ids(&state), vec![2, 3, 1]);
        assert_eq!(
            state.directory.canonical().iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let (render, _) = send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::DirectoryDecoded { users: vec![] }),
        );
        assert!(!render);
        assert_eq!(working_ids(&state).len(), 3);
    }

    #[test]
    fn worker_error_marks_fetch_failed() {
        let mut state = AppState::new(Theme::default());
        send(&mut state, Event::PermissionsResult { granted: true });
        send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error { message: "boom".to_string() }),
        );
        assert_eq!(state.fetch, FetchStatus::Failed);
    }

    #[test]
    fn typing_only_applies_in_query_mode() {
        let mut state = loaded();
        let (render, _) = send(&mut state, Event::Char('x'));
        assert!(!render);
        assert!(state.query.is_empty());

        send(&mut state, Event::FocusQuery(QueryField::Name));
        send(&mut state, Event::Char('A'));
        send(&mut state, Event::Char('n'));
        send(&mut state, Event::SwitchQueryField);
        send(&mut state, Event::Char('l'));
        assert_eq!(state.query.name, "An");
        assert_eq!(state.query.city, "l");
        assert_eq!(state.visible().iter().map(|l| l.id()).collect::<Vec<_>>(), vec![2, 3]);

        send(&mut state, Event::Char('a'));
        assert_eq!(state.visible().iter().map(|l| l.id()).collect::<Vec<_>>(), vec![3]);
        send(&mut state, Event::Backspace);

        send(&mut state, Event::Backspace);
        assert_eq!(state.query.city, "");

        send(&mut state, Event::FocusResults);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.query.name, "An");

        send(&mut state, Event::Escape);
        assert!(state.query.is_empty());
    }

    #[test]
    fn list_commands_are_ignored_while_typing() {
        let mut state = loaded();
        send(&mut state, Event::FocusQuery(QueryField::City));
        let (render, _) = send(&mut state, Event::DeleteSelected);
        assert!(!render);
        assert_eq!(working_ids(&state).len(), 3);
    }

    #[test]
    fn location_response_enables_distance_sort() {
        let mut state = loaded();
        let (render, _) = send(&mut state, Event::SelectSort(SortMode::Distance));
        assert!(!render);

        send(
            &mut state,
            Event::LocationFetched {
                status: 200,
                body: r#"{"status": "success", "lat": 0.0, "lon": 0.0}"#.to_string(),
            },
        );
        let (render, _) = send(&mut state, Event::SelectSort(SortMode::Distance));
        assert!(render);
        assert_eq!(working_ids(&state), vec![2, 3, 1]);
        assert_eq!(state.sort_mode, Some(SortMode::Distance));
    }

    #[test]
    fn failed_location_keeps_distance_hidden() {
        let mut state = loaded();
        send(
            &mut state,
            Event::LocationFetched { status: 500, body: String::new() },
        );
        assert!(matches!(state.geolocation.status(), LocationStatus::Unavailable(_)));
        assert!(!state.available_sort_modes().contains(&SortMode::Distance));
    }

    #[test]
    fn delete_then_restore() {
        let mut state = loaded();
        let (render, _) = send(&mut state, Event::Restore);
        assert!(!render);

        send(&mut state, Event::KeyDown);
        let (render, _) = send(&mut state, Event::DeleteSelected);
        assert!(render);
        assert_eq!(working_ids(&state), vec![2, 1]);

        let (render, _) = send(&mut state, Event::Restore);
        assert!(render);
        assert_eq!(working_ids(&state), vec![1, 2, 3]);
    }
}
