//! crates/logging-sink/src/file.rs
//! Append-to-file backend. The file is opened, written, and closed for
//! every record, so rotation tools can move it out from under the
//! server at any time without coordination.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use logging_core::{HeaderLevel, LogLevel, RecordView};

use crate::sink::{LogSink, SinkError};

/// Sink that appends one line per record to a file.
///
/// # Examples
///
/// ```no_run
/// use logging_sink::FileSink;
///
/// let sink = FileSink::create("/var/log/served.log")?;
/// assert!(sink.path().ends_with("served.log"));
/// # Ok::<(), logging_sink::SinkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Build a file sink, proving up front that the path is writable.
    ///
    /// The file is created if missing and left in place; a sink whose
    /// destination cannot be opened is refused here rather than failing
    /// on the first record.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn emit(
        &self,
        _level: LogLevel,
        view: RecordView<'_>,
        headers: HeaderLevel,
    ) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "{}", view.span(headers)).map_err(|source| SinkError::Write {
            target: self.path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> RecordView<'static> {
        RecordView {
            full: "stamp : CACHE :INFO: warm",
            component: "CACHE :INFO: warm",
            body: "warm",
        }
    }

    #[test]
    fn create_makes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let sink = FileSink::create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(sink.path(), path);
    }

    #[test]
    fn create_refuses_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("server.log");
        let err = FileSink::create(&path).unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
    }

    #[test]
    fn emit_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let sink = FileSink::create(&path).unwrap();

        sink.emit(LogLevel::Info, view(), HeaderLevel::All).unwrap();
        sink.emit(LogLevel::Info, view(), HeaderLevel::None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "stamp : CACHE :INFO: warm\nwarm\n");
    }

    #[test]
    fn emit_survives_file_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let sink = FileSink::create(&path).unwrap();

        sink.emit(LogLevel::Info, view(), HeaderLevel::None).unwrap();
        // Simulate rotation: the file disappears between records.
        std::fs::remove_file(&path).unwrap();
        sink.emit(LogLevel::Info, view(), HeaderLevel::None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "warm\n");
    }
}
