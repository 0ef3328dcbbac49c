//! crates/logging-core/src/lib.rs
//! Vocabulary types for the facility logging engine: severity levels,
//! component identifiers, header layout descriptions, the record
//! assembly buffer, and the captured process identity.
//!
//! This crate has no opinion about where records go; sinks and the
//! dispatch engine build on these types from their own crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

mod buffer;
mod component;
mod fields;
mod ident;
mod level;

pub use buffer::{RecordBuffer, RecordView, DEFAULT_CAPACITY};
pub use component::{Component, UnknownComponent, ALL_COMPONENTS};
pub use fields::{FieldsError, HeaderLevel, LogFields, TimeDateFormat};
pub use ident::{HeaderTemplate, ProcessIdent};
pub use level::{LevelError, LogLevel, ALL_LEVELS};
