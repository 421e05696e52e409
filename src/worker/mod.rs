//! Background worker for directory decoding.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: message processing, independent of the Zellij worker shim

pub mod handler;
pub mod messages;

pub use handler::DirectoryWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
