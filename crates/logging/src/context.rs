//! crates/logging/src/context.rs
//! Per-thread assembly state and the process-wide emergency fallback.
//!
//! Every reporting thread owns a lazily created context holding its
//! logical name and a reusable record buffer. When thread-local state
//! cannot be used (thread teardown, or a log call re-entered from
//! inside another log call), dispatch falls back to one shared
//! emergency context whose mutex fully serializes emergency logging.

use std::cell::RefCell;
use std::sync::{LazyLock, Mutex, PoisonError};

use logging_core::RecordBuffer;

/// Thread name reported by records that went through the fallback.
pub const EMERGENCY_NAME: &str = "* log emergency *";

struct ThreadState {
    name: String,
    buf: RecordBuffer,
}

impl ThreadState {
    fn new(name: String) -> Self {
        Self {
            name,
            buf: RecordBuffer::new(),
        }
    }
}

fn default_thread_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("anonymous")
        .to_string()
}

thread_local! {
    static CONTEXT: RefCell<ThreadState> =
        RefCell::new(ThreadState::new(default_thread_name()));
}

static EMERGENCY: LazyLock<Mutex<RecordBuffer>> =
    LazyLock::new(|| Mutex::new(RecordBuffer::new()));

/// Which context served a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextKind {
    /// The calling thread's own context.
    Thread,
    /// The shared emergency context.
    Emergency,
}

/// Run `f` with a reset record buffer and the owning thread name.
///
/// Prefers the thread-local context; falls back to the emergency
/// context when the thread-local one is unavailable or already in use.
/// The emergency mutex is held for the whole of `f` on the fallback
/// path, so emergency records never interleave.
pub(crate) fn with_buffer<R>(f: impl FnOnce(&mut RecordBuffer, &str) -> R) -> (R, ContextKind) {
    let usable = CONTEXT
        .try_with(|cell| cell.try_borrow_mut().is_ok())
        .unwrap_or(false);
    if usable {
        let result = CONTEXT.with(|cell| {
            let mut state = cell.borrow_mut();
            let state = &mut *state;
            state.buf.reset();
            f(&mut state.buf, &state.name)
        });
        (result, ContextKind::Thread)
    } else {
        let mut buf = EMERGENCY.lock().unwrap_or_else(PoisonError::into_inner);
        buf.reset();
        (f(&mut buf, EMERGENCY_NAME), ContextKind::Emergency)
    }
}

/// Replace the calling thread's logical name.
pub fn set_thread_name(name: impl Into<String>) {
    let name = name.into();
    let _ = CONTEXT.try_with(|cell| {
        if let Ok(mut state) = cell.try_borrow_mut() {
            state.name = name;
        }
    });
}

/// The calling thread's logical name as records will report it.
#[must_use]
pub fn thread_name() -> String {
    CONTEXT
        .try_with(|cell| {
            cell.try_borrow()
                .map(|state| state.name.clone())
                .unwrap_or_else(|_| EMERGENCY_NAME.to_string())
        })
        .unwrap_or_else(|_| EMERGENCY_NAME.to_string())
}

/// Drop the calling thread's context back to its freshly created
/// state, returning the buffer allocation. Idempotent; the context is
/// recreated on the next log call from this thread.
pub fn release_thread_context() {
    let _ = CONTEXT.try_with(|cell| {
        if let Ok(mut state) = cell.try_borrow_mut() {
            *state = ThreadState::new(default_thread_name());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn thread_context_serves_normal_calls() {
        let ((), kind) = with_buffer(|buf, _| {
            write!(buf, "hello").ok();
            assert_eq!(buf.view().full, "hello");
        });
        assert_eq!(kind, ContextKind::Thread);
    }

    #[test]
    fn buffer_is_reset_between_calls() {
        let ((), _) = with_buffer(|buf, _| {
            write!(buf, "first").ok();
        });
        let ((), _) = with_buffer(|buf, _| {
            assert!(buf.is_empty());
        });
    }

    #[test]
    fn reentrant_call_falls_back_to_emergency() {
        let ((), outer) = with_buffer(|_, _| {
            let ((), inner) = with_buffer(|_, name| {
                assert_eq!(name, EMERGENCY_NAME);
            });
            assert_eq!(inner, ContextKind::Emergency);
        });
        assert_eq!(outer, ContextKind::Thread);
    }

    #[test]
    fn names_are_per_thread() {
        set_thread_name("worker-7");
        let ((), _) = with_buffer(|_, name| assert_eq!(name, "worker-7"));

        std::thread::Builder::new()
            .name("spawned".to_string())
            .spawn(|| {
                let ((), _) = with_buffer(|_, name| assert_eq!(name, "spawned"));
            })
            .unwrap()
            .join()
            .unwrap();

        release_thread_context();
    }

    #[test]
    fn release_restores_the_default_name() {
        set_thread_name("temporary");
        assert_eq!(thread_name(), "temporary");
        release_thread_context();
        release_thread_context();
        assert_ne!(thread_name(), "temporary");
    }
}
