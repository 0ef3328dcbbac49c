//! crates/logging-core/src/level.rs
//! Ordered severity levels shared by components, facilities, and sinks.

use std::fmt;

use thiserror::Error;

/// Error returned when a level name or index cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The name matched no full or short level name.
    #[error("unknown log level name: {0:?}")]
    UnknownName(String),
    /// The numeric index was outside the level table.
    #[error("log level index out of range: {0}")]
    IndexOutOfRange(usize),
}

/// Severity of a log message or ceiling of a component/facility.
///
/// Lower numeric value means more severe. `Null` is the most severe
/// position in the order and doubles as "emit nothing" when used as a
/// ceiling: a record passes a ceiling when its level is numerically
/// less than or equal to the ceiling.
///
/// # Examples
///
/// ```
/// use logging_core::LogLevel;
///
/// assert!(LogLevel::Fatal < LogLevel::Debug);
/// assert_eq!(LogLevel::from_name("EVENT"), Some(LogLevel::Event));
/// assert_eq!(LogLevel::Warn.as_str(), "NIV_WARN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LogLevel {
    /// No output; always passes any ceiling.
    Null = 0,
    /// Unrecoverable error; dispatch terminates the process.
    Fatal = 1,
    /// Major failure, the operation cannot continue.
    Major = 2,
    /// Serious error, degraded but continuing.
    Crit = 3,
    /// Suspicious condition worth an operator's attention.
    Warn = 4,
    /// Normal but significant operational event.
    Event = 5,
    /// Informational detail.
    Info = 6,
    /// Developer diagnostics.
    Debug = 7,
    /// Verbose developer diagnostics.
    MidDebug = 8,
    /// Maximum verbosity.
    FullDebug = 9,
}

/// All levels in severity order, most severe first.
pub const ALL_LEVELS: [LogLevel; LogLevel::COUNT] = [
    LogLevel::Null,
    LogLevel::Fatal,
    LogLevel::Major,
    LogLevel::Crit,
    LogLevel::Warn,
    LogLevel::Event,
    LogLevel::Info,
    LogLevel::Debug,
    LogLevel::MidDebug,
    LogLevel::FullDebug,
];

impl LogLevel {
    /// Number of entries in the level table.
    pub const COUNT: usize = 10;

    /// Full symbolic name, stable across releases.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NIV_NULL",
            Self::Fatal => "NIV_FATAL",
            Self::Major => "NIV_MAJOR",
            Self::Crit => "NIV_CRIT",
            Self::Warn => "NIV_WARN",
            Self::Event => "NIV_EVENT",
            Self::Info => "NIV_INFO",
            Self::Debug => "NIV_DEBUG",
            Self::MidDebug => "NIV_MID_DEBUG",
            Self::FullDebug => "NIV_FULL_DEBUG",
        }
    }

    /// Short name used in the record header's component span.
    #[must_use]
    pub const fn short_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Fatal => "FATAL",
            Self::Major => "MAJOR",
            Self::Crit => "CRIT",
            Self::Warn => "WARN",
            Self::Event => "EVENT",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::MidDebug => "M_DBG",
            Self::FullDebug => "F_DBG",
        }
    }

    /// Position in the level table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Level at a table position, if in range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Null),
            1 => Some(Self::Fatal),
            2 => Some(Self::Major),
            3 => Some(Self::Crit),
            4 => Some(Self::Warn),
            5 => Some(Self::Event),
            6 => Some(Self::Info),
            7 => Some(Self::Debug),
            8 => Some(Self::MidDebug),
            9 => Some(Self::FullDebug),
            _ => None,
        }
    }

    /// Resolve a full name, a name without the `NIV_` prefix, or a
    /// short name. Matching is case-insensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name
            .strip_prefix("NIV_")
            .or_else(|| name.strip_prefix("niv_"))
            .unwrap_or(name);
        ALL_LEVELS.into_iter().find(|level| {
            let full = level
                .as_str()
                .strip_prefix("NIV_")
                .unwrap_or_else(|| level.as_str());
            bare.eq_ignore_ascii_case(full) || bare.eq_ignore_ascii_case(level.short_str())
        })
    }

    /// One step more verbose, saturating at [`LogLevel::FullDebug`].
    #[must_use]
    pub fn more_verbose(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Self::FullDebug)
    }

    /// One step less verbose, saturating at [`LogLevel::Null`].
    #[must_use]
    pub fn less_verbose(self) -> Self {
        match self.index() {
            0 => Self::Null,
            i => Self::from_index(i - 1).unwrap_or(Self::Null),
        }
    }

    /// Apply a signed verbosity delta, clamped to the table bounds.
    /// Positive is more verbose.
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        // More than COUNT steps saturates anyway.
        let steps = delta.unsigned_abs().min(Self::COUNT as u32);
        let mut level = self;
        for _ in 0..steps {
            level = if delta > 0 {
                level.more_verbose()
            } else {
                level.less_verbose()
            };
        }
        level
    }

    /// Whether a record at this level passes a ceiling at `ceiling`.
    #[must_use]
    pub const fn passes(self, ceiling: Self) -> bool {
        (self as u8) <= (ceiling as u8)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LevelError::UnknownName(s.to_string()))
    }
}
