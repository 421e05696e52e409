//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Traces go to `~/.local/share/zellij/yellowpage/yellowpage-otlp.json`, one
//! OTLP document per line, rotated at 10 MB with three backups kept. The
//! filter comes from the `trace_level` plugin option (default `info`) and
//! accepts any `EnvFilter` directive, e.g. `yellowpage=debug`.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON serialization
//! - `file_writer`: size-rotated output file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

/// `service.name` resource attribute and instrumentation scope.
pub const SERVICE_NAME: &str = "YellowPage";

/// Trace file name inside the plugin data directory.
pub const TRACE_FILE_NAME: &str = "yellowpage-otlp.json";
