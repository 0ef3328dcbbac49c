//! crates/logging-core/src/buffer.rs
//! Fixed-capacity assembly buffer for one log record.
//!
//! A record is assembled once per message into three nested spans:
//! the full text, the component span (component and severity onward),
//! and the message body. Facilities then pick the span matching their
//! header verbosity without re-rendering anything.

use std::fmt;

use crate::fields::HeaderLevel;

/// Default capacity of a record buffer in bytes.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Reusable assembly buffer with span marks and silent truncation.
///
/// Writing past the capacity truncates on a character boundary and
/// raises the [`RecordBuffer::is_truncated`] flag instead of failing;
/// a log line is always produced.
///
/// # Examples
///
/// ```
/// use std::fmt::Write;
/// use logging_core::RecordBuffer;
///
/// let mut buf = RecordBuffer::new();
/// write!(buf, "host prog : ").ok();
/// buf.mark_component();
/// write!(buf, "[main] NET : ").ok();
/// buf.mark_body();
/// write!(buf, "socket closed").ok();
///
/// let view = buf.view();
/// assert_eq!(view.body, "socket closed");
/// assert_eq!(view.component, "[main] NET : socket closed");
/// assert!(view.full.starts_with("host prog : "));
/// ```
#[derive(Debug)]
pub struct RecordBuffer {
    buf: String,
    capacity: usize,
    truncated: bool,
    component_at: usize,
    body_at: usize,
}

/// Borrowed spans of one assembled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    /// The whole record, header included.
    pub full: &'a str,
    /// Component span onward.
    pub component: &'a str,
    /// Message body only.
    pub body: &'a str,
}

impl RecordBuffer {
    /// New buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// New buffer with an explicit capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            capacity,
            truncated: false,
            component_at: 0,
            body_at: 0,
        }
    }

    /// Clear content, marks, and the truncation flag. The allocation
    /// is kept for reuse.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.truncated = false;
        self.component_at = 0;
        self.body_at = 0;
    }

    /// Bytes currently written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes still available before truncation sets in.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Whether any write since the last reset was cut short.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Mark the current position as the start of the component span.
    pub fn mark_component(&mut self) {
        self.component_at = self.buf.len();
        self.body_at = self.buf.len();
    }

    /// Mark the current position as the start of the message body.
    pub fn mark_body(&mut self) {
        self.body_at = self.buf.len();
    }

    /// Abandon everything written so far, keeping the buffer usable.
    /// Used when a header overflows the buffer before the body is in.
    pub fn rewind(&mut self) {
        self.buf.clear();
        self.truncated = false;
        self.component_at = 0;
        self.body_at = 0;
    }

    /// Borrow the three spans of the assembled record.
    #[must_use]
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            full: &self.buf,
            component: &self.buf[self.component_at..],
            body: &self.buf[self.body_at..],
        }
    }
}

impl<'a> RecordView<'a> {
    /// Span a facility with the given header verbosity should emit.
    #[must_use]
    pub const fn span(self, headers: HeaderLevel) -> &'a str {
        match headers {
            HeaderLevel::None => self.body,
            HeaderLevel::Component => self.component,
            HeaderLevel::All => self.full,
        }
    }
}

impl Default for RecordBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for RecordBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.capacity - self.buf.len();
        if s.len() <= remaining {
            self.buf.push_str(s);
            return Ok(());
        }
        // Keep as much as fits on a character boundary.
        let mut cut = remaining;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        self.truncated = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn spans_nest() {
        let mut buf = RecordBuffer::new();
        write!(buf, "header ").ok();
        buf.mark_component();
        write!(buf, "comp : ").ok();
        buf.mark_body();
        write!(buf, "body").ok();

        let view = buf.view();
        assert_eq!(view.full, "header comp : body");
        assert_eq!(view.component, "comp : body");
        assert_eq!(view.body, "body");
        assert!(!buf.is_truncated());
    }

    #[test]
    fn unmarked_spans_cover_everything() {
        let mut buf = RecordBuffer::new();
        write!(buf, "bare message").ok();
        let view = buf.view();
        assert_eq!(view.full, view.body);
        assert_eq!(view.component, view.body);
    }

    #[test]
    fn span_selection_follows_header_level() {
        let mut buf = RecordBuffer::new();
        write!(buf, "header ").ok();
        buf.mark_component();
        write!(buf, "comp : ").ok();
        buf.mark_body();
        write!(buf, "body").ok();

        let view = buf.view();
        assert_eq!(view.span(HeaderLevel::All), "header comp : body");
        assert_eq!(view.span(HeaderLevel::Component), "comp : body");
        assert_eq!(view.span(HeaderLevel::None), "body");
    }

    #[test]
    fn overflow_truncates_silently() {
        let mut buf = RecordBuffer::with_capacity(8);
        write!(buf, "0123456789").ok();
        assert_eq!(buf.view().full, "01234567");
        assert!(buf.is_truncated());
        assert_eq!(buf.remaining(), 0);

        // Further writes are dropped, never panicking.
        write!(buf, "more").ok();
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut buf = RecordBuffer::with_capacity(5);
        write!(buf, "ab\u{00e9}\u{00e9}").ok(); // 2 + 2 + 2 bytes
        assert_eq!(buf.view().full, "ab\u{00e9}");
        assert!(buf.is_truncated());
        assert!(buf.len() <= 5);
    }

    #[test]
    fn reset_clears_marks_and_flag() {
        let mut buf = RecordBuffer::with_capacity(8);
        write!(buf, "0123456789").ok();
        buf.mark_component();
        buf.reset();
        assert!(buf.is_empty());
        assert!(!buf.is_truncated());
        write!(buf, "x").ok();
        assert_eq!(buf.view().component, "x");
    }

    #[test]
    fn rewind_abandons_partial_header() {
        let mut buf = RecordBuffer::with_capacity(16);
        write!(buf, "overlong header piece").ok();
        assert!(buf.is_truncated());
        buf.rewind();
        assert!(buf.is_empty());
        assert!(!buf.is_truncated());
        write!(buf, "body only").ok();
        assert_eq!(buf.view().full, "body only");
    }

    #[test]
    fn allocation_survives_reset() {
        let mut buf = RecordBuffer::new();
        write!(buf, "{}", "x".repeat(100)).ok();
        let cap_before = buf.buf.capacity();
        buf.reset();
        assert!(buf.buf.capacity() >= cap_before.min(100));
    }
}
