//! Tracer provider backed by a file span exporter.
//!
//! The plugin runs in a WASI sandbox with no collector to talk to, so spans
//! are exported synchronously into a rotating OTLP/JSON file instead.

use super::file_writer::FileWriter;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Span exporter that appends one OTLP document per batch to a file.
///
/// # Thread Safety
///
/// The writer serializes appends behind a mutex, and the shutdown flag is an
/// atomic, so the exporter can be shared by the provider's processors.
struct FileSpanExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    const fn new(file_path: PathBuf, resource: Resource, scope: &'static str) -> Self {
        Self {
            writer: FileWriter::new(file_path),
            formatter: SpanFormatter::new(resource, scope),
            is_shutdown: AtomicBool::new(false),
        }
    }
}

impl SpanExporter for FileSpanExporter {
    /// Writes the batch as a single JSON line.
    ///
    /// The write happens before the future is returned; the future only
    /// carries the result. After [`SpanExporter::shutdown`] every export fails.
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("file exporter is shut down"))
        } else {
            let document = self.formatter.format_batch(&batch).to_string();
            self.writer
                .write_line(&document)
                .map_err(|e| TraceError::from(e.to_string()))
        };

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    /// The resource is fixed at construction.
    fn set_resource(&mut self, _resource: &Resource) {}
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("formatter", &self.formatter)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a provider whose spans are written to `file_path` as soon as they
/// end.
///
/// Uses a simple (unbatched) span processor: the WASI sandbox has no
/// background runtime to drive a batch processor.
///
/// # Parameters
///
/// * `file_path` - Trace file, created on the first export
/// * `resource` - Resource attributes (service name and version)
/// * `scope` - Instrumentation scope name written with every batch
///
/// # Returns
///
/// A provider ready to hand out tracers for the OpenTelemetry layer.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource, scope: &'static str) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, resource.clone(), scope);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
