//! crates/logging-sink/src/syslog.rs
//! syslog(3) backend over libc `openlog`/`syslog`/`closelog` directly,
//! keeping the dependency graph free of a dedicated syslog crate.

use std::ffi::CString;
use std::fmt;
use std::sync::OnceLock;

use logging_core::{HeaderLevel, LogLevel, RecordView};

use crate::sink::{LogSink, SinkError};

/// syslog(3) facility codes, the `LOG_*` constants from `<syslog.h>`.
///
/// Not to be confused with the engine's own log facilities: this is
/// the routing class the system logger files records under.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    /// LOG_KERN.
    Kern = libc::LOG_KERN,
    /// LOG_USER.
    User = libc::LOG_USER,
    /// LOG_MAIL.
    Mail = libc::LOG_MAIL,
    /// LOG_DAEMON, the default for a server process.
    Daemon = libc::LOG_DAEMON,
    /// LOG_AUTH.
    Auth = libc::LOG_AUTH,
    /// LOG_SYSLOG.
    Syslog = libc::LOG_SYSLOG,
    /// LOG_LPR.
    Lpr = libc::LOG_LPR,
    /// LOG_NEWS.
    News = libc::LOG_NEWS,
    /// LOG_UUCP.
    Uucp = libc::LOG_UUCP,
    /// LOG_CRON.
    Cron = libc::LOG_CRON,
    /// LOG_LOCAL0.
    Local0 = libc::LOG_LOCAL0,
    /// LOG_LOCAL1.
    Local1 = libc::LOG_LOCAL1,
    /// LOG_LOCAL2.
    Local2 = libc::LOG_LOCAL2,
    /// LOG_LOCAL3.
    Local3 = libc::LOG_LOCAL3,
    /// LOG_LOCAL4.
    Local4 = libc::LOG_LOCAL4,
    /// LOG_LOCAL5.
    Local5 = libc::LOG_LOCAL5,
    /// LOG_LOCAL6.
    Local6 = libc::LOG_LOCAL6,
    /// LOG_LOCAL7.
    Local7 = libc::LOG_LOCAL7,
}

const FACILITY_NAMES: [(SyslogFacility, &str); 18] = [
    (SyslogFacility::Kern, "kern"),
    (SyslogFacility::User, "user"),
    (SyslogFacility::Mail, "mail"),
    (SyslogFacility::Daemon, "daemon"),
    (SyslogFacility::Auth, "auth"),
    (SyslogFacility::Syslog, "syslog"),
    (SyslogFacility::Lpr, "lpr"),
    (SyslogFacility::News, "news"),
    (SyslogFacility::Uucp, "uucp"),
    (SyslogFacility::Cron, "cron"),
    (SyslogFacility::Local0, "local0"),
    (SyslogFacility::Local1, "local1"),
    (SyslogFacility::Local2, "local2"),
    (SyslogFacility::Local3, "local3"),
    (SyslogFacility::Local4, "local4"),
    (SyslogFacility::Local5, "local5"),
    (SyslogFacility::Local6, "local6"),
    (SyslogFacility::Local7, "local7"),
];

impl SyslogFacility {
    /// Resolve a configuration token, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FACILITY_NAMES
            .into_iter()
            .find(|(_, n)| name.eq_ignore_ascii_case(n))
            .map(|(f, _)| f)
    }

    /// Configuration name of the facility.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        FACILITY_NAMES
            .into_iter()
            .find(|(f, _)| *f == self)
            .map_or("user", |(_, n)| n)
    }
}

impl Default for SyslogFacility {
    fn default() -> Self {
        Self::Daemon
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// syslog(3) severity for one record.
const fn priority_for(level: LogLevel) -> libc::c_int {
    match level {
        LogLevel::Null | LogLevel::Event => libc::LOG_NOTICE,
        LogLevel::Fatal | LogLevel::Major => libc::LOG_CRIT,
        LogLevel::Crit => libc::LOG_ERR,
        LogLevel::Warn => libc::LOG_WARNING,
        LogLevel::Info => libc::LOG_INFO,
        LogLevel::Debug | LogLevel::MidDebug | LogLevel::FullDebug => libc::LOG_DEBUG,
    }
}

/// Sink that hands records to syslog(3).
///
/// Construction opens the connection with the configured facility and
/// tag; dropping the sink closes it. One syslog connection per process:
/// the engine registers a single shared instance at startup.
#[derive(Debug)]
pub struct SyslogSink {
    facility: SyslogFacility,
}

impl SyslogSink {
    /// Open the syslog connection.
    ///
    /// The tag is what the system logger prefixes each record with,
    /// normally the program name.
    #[must_use]
    pub fn open(facility: SyslogFacility, tag: &str) -> Self {
        // syslog(3) keeps the ident pointer, so it must live for the
        // process lifetime; a static OnceLock provides that.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            CString::new(tag).unwrap_or_else(|_| CString::new("served").unwrap_or_default())
        });

        // SAFETY: the ident pointer is valid for the process lifetime
        // because it is stored in a static OnceLock above. openlog has
        // no other preconditions.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, facility as libc::c_int);
        }
        Self { facility }
    }

    /// The syslog facility records are filed under.
    #[must_use]
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions beyond a prior openlog,
        // which Self::open performed.
        unsafe {
            libc::closelog();
        }
    }
}

impl LogSink for SyslogSink {
    fn emit(
        &self,
        level: LogLevel,
        view: RecordView<'_>,
        headers: HeaderLevel,
    ) -> Result<(), SinkError> {
        // A NUL byte in the record cannot cross the C boundary; the
        // record is dropped rather than failing dispatch.
        let Ok(message) = CString::new(view.span(headers)) else {
            return Ok(());
        };
        // The "%s" indirection keeps '%' in the record from being
        // interpreted as a format specifier by syslog(3).
        // SAFETY: syslog is thread-safe after openlog; both pointers
        // are valid NUL-terminated C strings.
        unsafe {
            libc::syslog(
                priority_for(level),
                b"%s\0".as_ptr().cast::<libc::c_char>(),
                message.as_ptr(),
            );
        }
        Ok(())
    }
}
