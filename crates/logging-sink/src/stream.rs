//! crates/logging-sink/src/stream.rs
//! Standard stream backends. One line per record, flushed immediately
//! so output interleaves sanely with anything else the process prints.

use std::io::Write;

use logging_core::{HeaderLevel, LogLevel, RecordView};

use crate::sink::{LogSink, SinkError};

/// Which standard stream a [`StreamSink`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTarget {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl StreamTarget {
    /// Destination name used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Sink that appends one line per record to a standard stream.
///
/// The stream's own lock makes each line atomic with respect to other
/// writers in the process.
#[derive(Debug, Clone, Copy)]
pub struct StreamSink {
    target: StreamTarget,
}

impl StreamSink {
    /// Sink writing to standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            target: StreamTarget::Stdout,
        }
    }

    /// Sink writing to standard error.
    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            target: StreamTarget::Stderr,
        }
    }

    /// The stream this sink writes to.
    #[must_use]
    pub const fn target(self) -> StreamTarget {
        self.target
    }

    fn write_line(self, line: &str) -> std::io::Result<()> {
        match self.target {
            StreamTarget::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            StreamTarget::Stderr => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{line}")?;
                err.flush()
            }
        }
    }
}

impl LogSink for StreamSink {
    fn emit(
        &self,
        _level: LogLevel,
        view: RecordView<'_>,
        headers: HeaderLevel,
    ) -> Result<(), SinkError> {
        self.write_line(view.span(headers))
            .map_err(|source| SinkError::Write {
                target: self.target.as_str().to_string(),
                source,
            })
    }
}
