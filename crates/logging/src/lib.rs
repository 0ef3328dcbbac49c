//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! The runtime logging engine of a long-lived multi-threaded server.
//! Structured log calls from arbitrary threads are formatted once into
//! a layered record (header, component span, body) and fanned out to
//! every active facility whose severity ceiling admits them. Facilities
//! are named delivery targets backed by [`logging_sink`] sinks; each
//! carries its own ceiling and header verbosity, so one record can
//! reach a terse syslog and a verbose debug file at the same time.
//!
//! # Design
//!
//! One [`LogRouter`] owns all shared state: the facility registry and
//! activation order behind a single `RwLock` (read for dispatch, write
//! for mutation), and the per-component severity table plus the header
//! format behind atomic swaps so readers never observe a torn update.
//! Per-thread record buffers are reused across calls; when a thread's
//! context is unavailable, dispatch serializes through one emergency
//! context instead of dropping the record. Verbosity is adjustable at
//! runtime by configuration commit, environment overrides (which pin a
//! component against later changes), and SIGUSR1/SIGUSR2.
//!
//! # Examples
//!
//! ```no_run
//! use logging::{init, log_event, set_thread_name, Component};
//!
//! init("served", None, None)?;
//! set_thread_name("main");
//! log_event!(Component::Main, "server ready on port {}", 2049);
//! # Ok::<(), logging::InitError>(())
//! ```
//!
//! # See also
//!
//! - [`logging_core`] for the severity, component, and buffer types.
//! - [`logging_sink`] for the delivery backends.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod assemble;
mod cleanup;
mod config;
mod context;
mod macros;
mod registry;
mod router;
mod severity;
#[cfg(unix)]
mod signal;

pub use assemble::CallSite;
pub use config::{ConfigError, FacilitySpec, FacilityState, LoggerConfig};
pub use context::{release_thread_context, set_thread_name, thread_name, EMERGENCY_NAME};
pub use registry::{Destination, Facility, RegistryError};
pub use router::{
    global, init, InitError, LogRouter, FILE_FACILITY, STDERR_FACILITY, STDOUT_FACILITY,
    SYSLOG_FACILITY, TEST_FACILITY,
};
pub use severity::SeverityTable;
#[cfg(unix)]
pub use signal::arm_verbosity_signals;

pub use logging_core::{
    Component, FieldsError, HeaderLevel, LogFields, LogLevel, ProcessIdent, TimeDateFormat,
};
pub use logging_sink::{CaptureSink, CapturedRecord, FileSink, LogSink, SinkError, StreamSink};
