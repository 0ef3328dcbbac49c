//! crates/logging-core/src/fields.rs
//! Header layout description: which fields appear in a record header
//! and how the timestamp is rendered.

use std::fmt;

use thiserror::Error;

/// Error returned when a header-field description is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldsError {
    /// A user-defined format was selected without a pattern.
    #[error("user-defined {0} format selected but no pattern given")]
    MissingUserPattern(&'static str),
    /// A pattern was supplied but the matching format is not
    /// user-defined, so it would silently never apply.
    #[error("user {0} pattern given but the {0} format is not user-defined")]
    UnusedUserPattern(&'static str),
    /// The microsecond stamp is a combined date+time format and must be
    /// selected for both or neither.
    #[error("syslog_usec must be selected for both date and time")]
    MismatchedUsec,
}

/// How much of the header a facility wants on each record.
///
/// Ordered from least to most: `None` drops the whole header,
/// `Component` keeps the component span only, `All` keeps everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderLevel {
    /// Message body only.
    None,
    /// Component span plus body.
    Component,
    /// Full header, component span, and body.
    #[default]
    All,
}

impl HeaderLevel {
    /// Name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Component => "COMPONENT",
            Self::All => "ALL",
        }
    }

    /// Resolve a configuration token, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::None, Self::Component, Self::All]
            .into_iter()
            .find(|h| name.eq_ignore_ascii_case(h.as_str()))
    }
}

impl fmt::Display for HeaderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp rendering style for the date or time half of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeDateFormat {
    /// Omit this half entirely.
    None,
    /// Day-first date (`%d/%m/%Y`) and wall-clock time (`%H:%M:%S`).
    Legacy,
    /// Locale-preferred rendering (`%x` / `%X`, `%c` when both).
    Local,
    /// ISO 8601 date (`%F`).
    Iso8601,
    /// Classic syslog stamp (`%b %e`).
    Syslog,
    /// RFC 5424 stamp with microseconds; covers both date and time.
    SyslogUsec,
    /// Caller-supplied strftime-style pattern.
    UserDefined,
}

impl TimeDateFormat {
    /// Resolve a configuration token, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let token = name.trim();
        if token.eq_ignore_ascii_case("none") || token.eq_ignore_ascii_case("false") {
            Some(Self::None)
        } else if token.eq_ignore_ascii_case("legacy") || token.eq_ignore_ascii_case("true") {
            Some(Self::Legacy)
        } else if token.eq_ignore_ascii_case("local") {
            Some(Self::Local)
        } else if token.eq_ignore_ascii_case("8601")
            || token.eq_ignore_ascii_case("iso-8601")
            || token.eq_ignore_ascii_case("iso 8601")
            || token.eq_ignore_ascii_case("iso")
        {
            Some(Self::Iso8601)
        } else if token.eq_ignore_ascii_case("syslog") {
            Some(Self::Syslog)
        } else if token.eq_ignore_ascii_case("syslog_usec") {
            Some(Self::SyslogUsec)
        } else if token.eq_ignore_ascii_case("user_defined") {
            Some(Self::UserDefined)
        } else {
            None
        }
    }
}

/// Full description of a record header layout.
///
/// Ten independent field toggles plus the date/time rendering styles.
/// The default layout matches what a fresh engine prints: everything on
/// except source file and line number, legacy date and time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogFields {
    /// Date rendering style.
    pub date_format: TimeDateFormat,
    /// Time rendering style.
    pub time_format: TimeDateFormat,
    /// Pattern for [`TimeDateFormat::UserDefined`] dates.
    pub user_date_pattern: String,
    /// Pattern for [`TimeDateFormat::UserDefined`] times.
    pub user_time_pattern: String,
    /// Process epoch (start time, hex) in the constant header.
    pub disp_epoch: bool,
    /// Host name in the constant header.
    pub disp_host: bool,
    /// Program name in the constant header.
    pub disp_prog: bool,
    /// Process id in the constant header.
    pub disp_pid: bool,
    /// Reporting thread's name.
    pub disp_threadname: bool,
    /// Source file of the call site.
    pub disp_filename: bool,
    /// Source line of the call site.
    pub disp_linenum: bool,
    /// Function name of the call site.
    pub disp_funct: bool,
    /// Component short name in the component span.
    pub disp_component: bool,
    /// Severity short name in the component span.
    pub disp_level: bool,
}

impl Default for LogFields {
    fn default() -> Self {
        Self {
            date_format: TimeDateFormat::Legacy,
            time_format: TimeDateFormat::Legacy,
            user_date_pattern: String::new(),
            user_time_pattern: String::new(),
            disp_epoch: true,
            disp_host: true,
            disp_prog: true,
            disp_pid: true,
            disp_threadname: true,
            disp_filename: false,
            disp_linenum: false,
            disp_funct: true,
            disp_component: true,
            disp_level: true,
        }
    }
}

impl LogFields {
    /// Check internal consistency of the format selection.
    pub fn validate(&self) -> Result<(), FieldsError> {
        if self.date_format == TimeDateFormat::UserDefined && self.user_date_pattern.is_empty() {
            return Err(FieldsError::MissingUserPattern("date"));
        }
        if self.time_format == TimeDateFormat::UserDefined && self.user_time_pattern.is_empty() {
            return Err(FieldsError::MissingUserPattern("time"));
        }
        if self.date_format != TimeDateFormat::UserDefined && !self.user_date_pattern.is_empty() {
            return Err(FieldsError::UnusedUserPattern("date"));
        }
        if self.time_format != TimeDateFormat::UserDefined && !self.user_time_pattern.is_empty() {
            return Err(FieldsError::UnusedUserPattern("time"));
        }
        if (self.date_format == TimeDateFormat::SyslogUsec)
            != (self.time_format == TimeDateFormat::SyslogUsec)
        {
            return Err(FieldsError::MismatchedUsec);
        }
        Ok(())
    }

    /// Combined strftime-style pattern for the timestamp, trailing
    /// space included when non-empty. Empty when both halves are off.
    #[must_use]
    pub fn timestamp_pattern(&self) -> String {
        if self.date_format == TimeDateFormat::Local && self.time_format == TimeDateFormat::Local {
            return "%c ".to_string();
        }
        let mut pattern = String::new();
        match self.date_format {
            TimeDateFormat::None => {}
            TimeDateFormat::Legacy => pattern.push_str("%d/%m/%Y "),
            TimeDateFormat::Local => pattern.push_str("%x "),
            TimeDateFormat::Iso8601 => pattern.push_str("%F "),
            TimeDateFormat::Syslog => pattern.push_str("%b %e "),
            // Combined with the time half below, no separating space.
            TimeDateFormat::SyslogUsec => pattern.push_str("%F"),
            TimeDateFormat::UserDefined => {
                pattern.push_str(&self.user_date_pattern);
                pattern.push(' ');
            }
        }
        match self.time_format {
            TimeDateFormat::None => {}
            TimeDateFormat::Legacy => pattern.push_str("%H:%M:%S "),
            TimeDateFormat::Local | TimeDateFormat::Iso8601 | TimeDateFormat::Syslog => {
                pattern.push_str("%X ");
            }
            TimeDateFormat::SyslogUsec => pattern.push_str("T%H:%M:%S%.6f%z "),
            TimeDateFormat::UserDefined => {
                pattern.push_str(&self.user_time_pattern);
                pattern.push(' ');
            }
        }
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_levels_are_ordered() {
        assert!(HeaderLevel::None < HeaderLevel::Component);
        assert!(HeaderLevel::Component < HeaderLevel::All);
        assert_eq!(HeaderLevel::default(), HeaderLevel::All);
    }

    #[test]
    fn header_level_names() {
        assert_eq!(HeaderLevel::from_name("component"), Some(HeaderLevel::Component));
        assert_eq!(HeaderLevel::from_name("ALL"), Some(HeaderLevel::All));
        assert_eq!(HeaderLevel::from_name("half"), None);
    }

    #[test]
    fn format_tokens() {
        assert_eq!(TimeDateFormat::from_name("ISO-8601"), Some(TimeDateFormat::Iso8601));
        assert_eq!(TimeDateFormat::from_name("8601"), Some(TimeDateFormat::Iso8601));
        assert_eq!(TimeDateFormat::from_name("true"), Some(TimeDateFormat::Legacy));
        assert_eq!(TimeDateFormat::from_name("false"), Some(TimeDateFormat::None));
        assert_eq!(TimeDateFormat::from_name(" syslog "), Some(TimeDateFormat::Syslog));
        assert_eq!(TimeDateFormat::from_name("julian"), None);
    }

    #[test]
    fn default_layout() {
        let fields = LogFields::default();
        assert!(fields.disp_epoch && fields.disp_host && fields.disp_prog);
        assert!(fields.disp_pid && fields.disp_threadname && fields.disp_funct);
        assert!(fields.disp_component && fields.disp_level);
        assert!(!fields.disp_filename && !fields.disp_linenum);
        assert_eq!(fields.date_format, TimeDateFormat::Legacy);
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn default_timestamp_pattern() {
        assert_eq!(LogFields::default().timestamp_pattern(), "%d/%m/%Y %H:%M:%S ");
    }

    #[test]
    fn local_both_collapses_to_preferred_stamp() {
        let fields = LogFields {
            date_format: TimeDateFormat::Local,
            time_format: TimeDateFormat::Local,
            ..LogFields::default()
        };
        assert_eq!(fields.timestamp_pattern(), "%c ");
    }

    #[test]
    fn usec_stamp_is_combined() {
        let fields = LogFields {
            date_format: TimeDateFormat::SyslogUsec,
            time_format: TimeDateFormat::SyslogUsec,
            ..LogFields::default()
        };
        assert!(fields.validate().is_ok());
        assert_eq!(fields.timestamp_pattern(), "%FT%H:%M:%S%.6f%z ");
    }

    #[test]
    fn usec_stamp_must_cover_both_halves() {
        let fields = LogFields {
            date_format: TimeDateFormat::SyslogUsec,
            time_format: TimeDateFormat::Legacy,
            ..LogFields::default()
        };
        assert_eq!(fields.validate(), Err(FieldsError::MismatchedUsec));
    }

    #[test]
    fn user_pattern_required() {
        let fields = LogFields {
            time_format: TimeDateFormat::UserDefined,
            ..LogFields::default()
        };
        assert_eq!(
            fields.validate(),
            Err(FieldsError::MissingUserPattern("time"))
        );

        let fields = LogFields {
            time_format: TimeDateFormat::UserDefined,
            user_time_pattern: "%H%M".to_string(),
            ..LogFields::default()
        };
        assert!(fields.validate().is_ok());
        assert_eq!(fields.timestamp_pattern(), "%d/%m/%Y %H%M ");
    }

    #[test]
    fn stray_user_pattern_is_rejected() {
        let fields = LogFields {
            user_date_pattern: "%Y".to_string(),
            ..LogFields::default()
        };
        assert_eq!(fields.validate(), Err(FieldsError::UnusedUserPattern("date")));
    }

    #[test]
    fn disabled_stamp_is_empty() {
        let fields = LogFields {
            date_format: TimeDateFormat::None,
            time_format: TimeDateFormat::None,
            ..LogFields::default()
        };
        assert_eq!(fields.timestamp_pattern(), "");
    }
}
