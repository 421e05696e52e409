//! Worker-side message processing.
//!
//! Decoding the directory payload happens off the render thread. The plugin
//! shim owns the Zellij worker registration and IPC; this module only turns a
//! [`WorkerMessage`] into a [`WorkerResponse`].

use crate::domain::decode_directory;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker thread state.
#[derive(Debug, Default)]
pub struct DirectoryWorker {
    /// Number of payloads processed, for log correlation.
    handled: u64,
}

impl DirectoryWorker {
    /// Attaches the sender's trace context so worker spans nest under the
    /// plugin span that posted the message.
    ///
    /// The returned guard must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }

    /// Processes one message and produces the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        self.handled += 1;

        let _span = tracing::debug_span!("worker_handle_message", seq = self.handled).entered();

        match message {
            WorkerMessage::DecodeDirectory { body, .. } => match decode_directory(&body) {
                Ok(users) => {
                    tracing::debug!(user_count = users.len(), "directory payload decoded");
                    WorkerResponse::DirectoryDecoded { users }
                }
                Err(e) => {
                    tracing::debug!(error = %e, body_len = body.len(), "directory payload rejected");
                    WorkerResponse::Error {
                        message: format!("decode directory: {e}"),
                    }
                }
            },
        }
    }

    /// Deserializes a raw IPC payload and handles it.
    ///
    /// Malformed payloads produce an [`WorkerResponse::Error`] rather than
    /// being dropped, so the plugin always learns that the fetch went nowhere.
    pub fn handle_payload(&mut self, payload: &str) -> WorkerResponse {
        match serde_json::from_str::<WorkerMessage>(payload) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: format!("invalid worker message: {e}"),
                }
            }
        }
    }

    /// Handles a raw IPC payload and serializes the response for posting back.
    ///
    /// Always yields a payload: if the response cannot be serialized, an
    /// [`WorkerResponse::Error`] payload is produced instead, so the plugin
    /// never waits on a reply that was silently dropped.
    pub fn respond(&mut self, payload: &str) -> String {
        let response = self.handle_payload(payload);
        serde_json::to_string(&response).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize worker response");
            error_payload(&format!("serialize worker response: {e}"))
        })
    }
}

/// Serialized [`WorkerResponse::Error`], built without a fallible encoder.
fn error_payload(message: &str) -> String {
    serde_json::json!({ "Error": { "message": message } }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_directory_in_fetch_order() {
        let mut worker = DirectoryWorker::default();
        let body = r#"[{"id": 2, "name": "B"}, {"id": 1, "name": "A"}]"#;
        let response = worker.handle_message(WorkerMessage::decode_directory(body.to_string()));

        let WorkerResponse::DirectoryDecoded { users } = response else {
            panic!("expected decoded directory, got {response:?}");
        };
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn bad_body_becomes_error_response() {
        let mut worker = DirectoryWorker::default();
        let response = worker.handle_message(WorkerMessage::decode_directory("<html>".to_string()));
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }

    #[test]
    fn payload_round_trips_through_json() {
        let mut worker = DirectoryWorker::default();
        let message = WorkerMessage::decode_directory(r#"[{"id": 1, "name": "A"}]"#.to_string());
        let payload = serde_json::to_string(&message).unwrap();

        assert!(matches!(
            worker.handle_payload(&payload),
            WorkerResponse::DirectoryDecoded { .. }
        ));
        assert!(matches!(
            worker.handle_payload("{}"),
            WorkerResponse::Error { .. }
        ));
    }

    #[test]
    fn respond_serializes_the_response() {
        let mut worker = DirectoryWorker::default();
        let message = WorkerMessage::decode_directory(r#"[{"id": 7, "name": "G"}]"#.to_string());
        let reply = worker.respond(&serde_json::to_string(&message).unwrap());

        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert!(matches!(response, WorkerResponse::DirectoryDecoded { ref users } if users[0].id == 7));
    }

    #[test]
    fn error_payload_decodes_as_error_response() {
        let response: WorkerResponse = serde_json::from_str(&error_payload("boom \"quoted\"")).unwrap();
        assert_eq!(
            response,
            WorkerResponse::Error {
                message: "boom \"quoted\"".to_string()
            }
        );
    }
}
