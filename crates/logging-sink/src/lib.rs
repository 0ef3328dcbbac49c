//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the delivery backends of the facility
//! logging engine. A backend implements [`LogSink`]: it receives one
//! assembled [`logging_core::RecordView`] per message together with
//! the header verbosity of the facility it serves, selects the
//! matching span, and delivers it.
//!
//! # Design
//!
//! Backends are deliberately stateless where the destination allows
//! it: [`FileSink`] reopens its file for every record so log rotation
//! needs no coordination, and [`StreamSink`] relies on the stream's
//! own lock for line atomicity. [`SyslogSink`] holds the single
//! process-wide syslog(3) connection. [`CaptureSink`] retains records
//! in memory for tests and self-inspection.
//!
//! # Errors
//!
//! Delivery failures surface as [`SinkError`]. The dispatch engine
//! treats them as per-facility events: a failing sink never stops
//! records from reaching the other facilities.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod file;
mod sink;
mod stream;
#[cfg(unix)]
mod syslog;

pub use file::FileSink;
pub use sink::{CaptureSink, CapturedRecord, LogSink, SinkError};
pub use stream::{StreamSink, StreamTarget};
#[cfg(unix)]
pub use syslog::{SyslogFacility, SyslogSink};
