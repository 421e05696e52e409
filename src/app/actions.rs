//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler mutates [`AppState`](crate::app::AppState) and returns a
//! list of actions; the shim in `main.rs` turns them into Zellij API calls.
//! Keeping the effects out of the handler is what makes the state machine
//! testable without a Zellij host.

use crate::worker::WorkerMessage;

/// Commands for the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Issues the one-time GET to the directory endpoint.
    ///
    /// The response comes back as [`Event::DirectoryFetched`](crate::app::Event::DirectoryFetched).
    FetchDirectory {
        url: String,
    },

    /// Issues the one-time IP geolocation lookup.
    ///
    /// The response comes back as [`Event::LocationFetched`](crate::app::Event::LocationFetched).
    RequestLocation {
        url: String,
    },

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),
}
