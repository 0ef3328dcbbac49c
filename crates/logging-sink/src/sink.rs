//! crates/logging-sink/src/sink.rs
//! The delivery contract every facility backend implements, plus an
//! in-memory capture backend for tests and self-inspection.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use logging_core::{HeaderLevel, LogLevel, RecordView};
use thiserror::Error;

/// Error raised while delivering one record to a backend.
///
/// Delivery failures never stop dispatch; the engine reports them
/// through its own diagnostics and carries on with the next facility.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to a stream or file failed.
    #[error("write to {target} failed")]
    Write {
        /// Human-readable destination name.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the destination file failed.
    #[error("cannot open log file {path}")]
    Open {
        /// The file that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// One delivery backend.
///
/// A sink receives the fully assembled record and the header verbosity
/// of the facility it serves; it selects the matching span with
/// [`RecordView::span`] and delivers it. Sinks are shared across
/// threads behind `Arc<dyn LogSink>` and must synchronize internally.
pub trait LogSink: Send + Sync {
    /// Deliver one record.
    fn emit(
        &self,
        level: LogLevel,
        view: RecordView<'_>,
        headers: HeaderLevel,
    ) -> Result<(), SinkError>;
}

/// Record retained by a [`CaptureSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Severity the record was emitted at.
    pub level: LogLevel,
    /// The span that would have been written, newline excluded.
    pub line: String,
}

/// Sink that retains every record in memory.
///
/// Cloning shares the buffer, so a test can keep one handle while the
/// engine owns the other.
///
/// # Examples
///
/// ```
/// use logging_core::{HeaderLevel, LogLevel, RecordView};
/// use logging_sink::{CaptureSink, LogSink};
///
/// let sink = CaptureSink::new();
/// let view = RecordView { full: "hdr body", component: "body", body: "body" };
/// sink.emit(LogLevel::Event, view, HeaderLevel::None).unwrap();
/// assert_eq!(sink.take()[0].line, "body");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl CaptureSink {
    /// New empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and return everything captured so far.
    #[must_use]
    pub fn take(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default()
    }

    /// Copy of the captured lines, delivery order preserved.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|r| r.iter().map(|rec| rec.line.clone()).collect())
            .unwrap_or_default()
    }
}

impl LogSink for CaptureSink {
    fn emit(
        &self,
        level: LogLevel,
        view: RecordView<'_>,
        headers: HeaderLevel,
    ) -> Result<(), SinkError> {
        if let Ok(mut records) = self.records.lock() {
            records.push(CapturedRecord {
                level,
                line: view.span(headers).to_string(),
            });
        }
        Ok(())
    }
}
