//! crates/logging/src/cleanup.rs
//! Cleanup hooks executed on fatal termination, newest first.

use std::sync::{Mutex, PoisonError};

type Hook = Box<dyn FnOnce() + Send>;

/// LIFO stack of teardown callbacks.
///
/// Hooks registered by subsystems run exactly once, in reverse
/// registration order, when a fatal record has been delivered and the
/// process is about to terminate.
#[derive(Default)]
pub(crate) struct CleanupStack {
    hooks: Mutex<Vec<Hook>>,
}

impl CleanupStack {
    /// Push a hook; it runs before earlier-registered hooks.
    pub fn register(&self, hook: Hook) {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    /// Number of hooks waiting.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run every hook, newest first, leaving the stack empty.
    pub fn run_all(&self) {
        loop {
            let hook = self
                .hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop();
            match hook {
                Some(hook) => hook(),
                None => break,
            }
        }
    }
}

impl std::fmt::Debug for CleanupStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupStack").finish_non_exhaustive()
    }
}

/// What dispatch does after a fatal record is delivered and the
/// cleanup stack has run. The default terminates the process with
/// exit code 2; tests substitute a recording action.
pub(crate) struct FatalAction(Box<dyn Fn() + Send + Sync>);

impl FatalAction {
    pub fn exit_process() -> Self {
        Self(Box::new(|| std::process::exit(2)))
    }

    pub fn custom(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Box::new(action))
    }

    pub fn run(&self) {
        (self.0)();
    }
}

impl std::fmt::Debug for FatalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FatalAction").finish_non_exhaustive()
    }
}
