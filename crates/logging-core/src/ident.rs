//! crates/logging-core/src/ident.rs
//! Process identity captured once at startup and the pre-rendered
//! constant portion of the record header.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fields::LogFields;

/// Identity of the running process, captured once and then immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdent {
    /// Seconds since the Unix epoch at capture time.
    pub epoch: u64,
    /// Host name, `localhost` when it cannot be read.
    pub hostname: String,
    /// Program name as reported in headers.
    pub program: String,
    /// Process id.
    pub pid: u32,
}

impl ProcessIdent {
    /// Capture the current process identity.
    #[must_use]
    pub fn capture(program: impl Into<String>) -> Self {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            epoch,
            hostname: hostname(),
            program: program.into(),
            pid: std::process::id(),
        }
    }
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0_u8; 256];
    // SAFETY: buf is writable for its full length; the terminator is
    // forced below because truncation may leave the buffer unterminated.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len() - 1) };
    if rc != 0 {
        return "localhost".to_string();
    }
    buf[buf.len() - 1] = 0;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    if end == 0 {
        return "localhost".to_string();
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// Pre-rendered header pieces that only change when the field layout
/// changes, never per record.
///
/// Dispatch renders a record header as the timestamp (from
/// [`HeaderTemplate::timestamp_pattern`]) followed by
/// [`HeaderTemplate::const_prefix`]. Rebuilt and swapped wholesale on
/// every layout or identity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    /// Identity portion of the header (epoch, host, program, pid).
    pub const_prefix: String,
    /// strftime-style pattern for the per-record timestamp, empty when
    /// timestamps are off.
    pub timestamp_pattern: String,
}

impl HeaderTemplate {
    /// Render the constant header pieces for a field layout and
    /// process identity.
    #[must_use]
    pub fn build(fields: &LogFields, ident: &ProcessIdent) -> Self {
        let mut prefix = String::new();
        if fields.disp_epoch {
            let _ = write!(prefix, ": epoch {:08x} ", ident.epoch);
        }
        if fields.disp_host {
            let _ = write!(prefix, ": {} ", ident.hostname);
        }
        if fields.disp_prog {
            let _ = write!(prefix, ": {}", ident.program);
        }
        if fields.disp_prog && fields.disp_pid {
            prefix.push('-');
        }
        if fields.disp_pid {
            let _ = write!(prefix, "{}", ident.pid);
        }
        // The thread-name span supplies its own separation.
        if (fields.disp_prog || fields.disp_pid) && !fields.disp_threadname {
            prefix.push(' ');
        }
        Self {
            const_prefix: prefix,
            timestamp_pattern: fields.timestamp_pattern(),
        }
    }
}
