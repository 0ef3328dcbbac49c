//! crates/logging/src/assemble.rs
//! Renders one record into the caller's buffer: header span, component
//! span, body span, each marked so facilities can pick their slice.

use std::fmt;
use std::fmt::Write as _;

use chrono::Local;
use logging_core::{
    Component, HeaderLevel, HeaderTemplate, LogFields, LogLevel, RecordBuffer,
};

/// Where in the source tree a log call was made.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Source file, as produced by `file!()`.
    pub file: &'a str,
    /// Source line, as produced by `line!()`.
    pub line: u32,
    /// Enclosing function or module path.
    pub function: &'a str,
}

/// Header layout plus its pre-rendered template; swapped wholesale
/// whenever the layout or identity changes.
#[derive(Debug, Clone)]
pub(crate) struct FormatState {
    pub fields: LogFields,
    pub template: HeaderTemplate,
}

/// Assemble a full record into `buf`.
///
/// Only the spans some active facility can use are rendered:
/// `max_headers` caps the work at the registry-wide ceiling. An
/// overflowing header abandons everything rendered so far and restarts
/// at the body, so a message is never lost to its own decoration.
pub(crate) fn assemble(
    buf: &mut RecordBuffer,
    format: &FormatState,
    max_headers: HeaderLevel,
    thread_name: &str,
    component: Component,
    level: LogLevel,
    site: CallSite<'_>,
    args: fmt::Arguments<'_>,
) {
    let fields = &format.fields;

    if max_headers >= HeaderLevel::All {
        if !format.template.timestamp_pattern.is_empty() {
            let _ = write!(
                buf,
                "{}",
                Local::now().format(&format.template.timestamp_pattern)
            );
        }
        let _ = buf.write_str(&format.template.const_prefix);
        // Without a thread name the component span needs a separator.
        if !fields.disp_threadname {
            let _ = buf.write_str(": ");
        }
        if buf.is_truncated() {
            buf.rewind();
        }
    }

    buf.mark_component();
    if max_headers >= HeaderLevel::Component {
        if fields.disp_threadname {
            let _ = write!(buf, "[{thread_name}] ");
        }
        if fields.disp_filename {
            if fields.disp_linenum {
                let _ = write!(buf, "{}:", site.file);
            } else {
                let _ = write!(buf, "{} :", site.file);
            }
        }
        if fields.disp_linenum {
            let _ = write!(buf, "{} :", site.line);
        }
        if fields.disp_funct {
            let _ = write!(buf, "{} :", site.function);
        }
        if fields.disp_component {
            let _ = write!(buf, "{} :", component.short_str());
        }
        if fields.disp_level {
            let _ = write!(buf, "{} :", level.short_str());
        }
        // A header that fills the whole buffer is abandoned outright.
        if buf.is_truncated() {
            buf.rewind();
            buf.mark_component();
        }
    }

    buf.mark_body();
    let _ = buf.write_fmt(args);
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_core::{ProcessIdent, TimeDateFormat};

    fn format_state(fields: LogFields) -> FormatState {
        let ident = ProcessIdent {
            epoch: 0xabcd_1234,
            hostname: "node1".to_string(),
            program: "served".to_string(),
            pid: 77,
        };
        let template = HeaderTemplate::build(&fields, &ident);
        FormatState { fields, template }
    }

    fn site() -> CallSite<'static> {
        CallSite {
            file: "src/net.rs",
            line: 42,
            function: "server::net::accept",
        }
    }

    fn stampless_fields() -> LogFields {
        LogFields {
            date_format: TimeDateFormat::None,
            time_format: TimeDateFormat::None,
            ..LogFields::default()
        }
    }

    #[test]
    fn full_record_layout() {
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(stampless_fields()),
            HeaderLevel::All,
            "worker-1",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("connection from {}", "10.0.0.9"),
        );
        let view = buf.view();
        assert_eq!(
            view.full,
            ": epoch abcd1234 : node1 : served-77[worker-1] \
             server::net::accept :NET :EVENT :connection from 10.0.0.9"
        );
        assert_eq!(
            view.component,
            "[worker-1] server::net::accept :NET :EVENT :connection from 10.0.0.9"
        );
        assert_eq!(view.body, "connection from 10.0.0.9");
    }

    #[test]
    fn component_ceiling_skips_the_header() {
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(stampless_fields()),
            HeaderLevel::Component,
            "worker-1",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("msg"),
        );
        let view = buf.view();
        assert_eq!(view.full, view.component);
        assert!(view.full.starts_with("[worker-1] "));
    }

    #[test]
    fn body_ceiling_renders_body_only() {
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(stampless_fields()),
            HeaderLevel::None,
            "worker-1",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("just the message"),
        );
        assert_eq!(buf.view().full, "just the message");
    }

    #[test]
    fn file_and_line_toggles() {
        let fields = LogFields {
            disp_filename: true,
            disp_linenum: true,
            disp_funct: false,
            disp_threadname: false,
            ..stampless_fields()
        };
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(fields),
            HeaderLevel::Component,
            "worker-1",
            Component::Cache,
            LogLevel::Debug,
            site(),
            format_args!("m"),
        );
        assert_eq!(buf.view().component, "src/net.rs:42 :CACHE :DEBUG :m");
    }

    #[test]
    fn missing_threadname_adds_header_separator() {
        let fields = LogFields {
            disp_threadname: false,
            ..stampless_fields()
        };
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(fields),
            HeaderLevel::All,
            "ignored",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("m"),
        );
        assert!(buf.view().full.contains("served-77 : server::net::accept"));
    }

    #[test]
    fn timestamp_is_rendered_when_enabled() {
        let fields = LogFields {
            date_format: TimeDateFormat::Iso8601,
            time_format: TimeDateFormat::None,
            disp_epoch: false,
            disp_host: false,
            disp_prog: false,
            disp_pid: false,
            disp_threadname: false,
            ..LogFields::default()
        };
        let mut buf = RecordBuffer::new();
        assemble(
            &mut buf,
            &format_state(fields),
            HeaderLevel::All,
            "t",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("m"),
        );
        let full = buf.view().full.to_string();
        // %F renders as yyyy-mm-dd.
        let date = &full[..10];
        assert_eq!(date.matches('-').count(), 2);
        assert!(full.ends_with(":m"));
    }

    #[test]
    fn overflowing_header_is_abandoned_not_the_message() {
        let mut buf = RecordBuffer::with_capacity(48);
        assemble(
            &mut buf,
            &format_state(stampless_fields()),
            HeaderLevel::All,
            "a-particularly-long-worker-thread-name",
            Component::Net,
            LogLevel::Event,
            site(),
            format_args!("kept"),
        );
        assert_eq!(buf.view().body, "kept");
        assert!(buf.view().full.len() <= 48);
    }
}
