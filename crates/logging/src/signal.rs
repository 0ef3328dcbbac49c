//! crates/logging/src/signal.rs
//! SIGUSR1/SIGUSR2 verbosity control.
//!
//! The handlers are async-signal-safe: they only move one atomic
//! counter. The accumulated delta is applied to the severity table by
//! the next level query or dispatch on a normal thread.

#![cfg(unix)]

use std::io;
use std::sync::atomic::{AtomicI32, Ordering};

static PENDING_DELTA: AtomicI32 = AtomicI32::new(0);

extern "C" fn on_more_verbose(_signum: libc::c_int) {
    PENDING_DELTA.fetch_add(1, Ordering::Relaxed);
}

extern "C" fn on_less_verbose(_signum: libc::c_int) {
    PENDING_DELTA.fetch_sub(1, Ordering::Relaxed);
}

/// Take and clear the delta accumulated by signals since the last call.
pub(crate) fn take_pending_delta() -> i32 {
    PENDING_DELTA.swap(0, Ordering::Relaxed)
}

fn arm(signum: libc::c_int, handler: extern "C" fn(libc::c_int)) -> io::Result<()> {
    // SAFETY: the sigaction struct is fully initialized before use and
    // the handler only touches an atomic, which is async-signal-safe.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler as usize;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(signum, &action, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Bind SIGUSR1 (more verbose) and SIGUSR2 (less verbose) to the
/// broadcast verbosity bump.
pub fn arm_verbosity_signals() -> io::Result<()> {
    arm(libc::SIGUSR1, on_more_verbose)?;
    arm(libc::SIGUSR2, on_less_verbose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_delta_accumulates_and_drains() {
        take_pending_delta();
        on_more_verbose(libc::SIGUSR1);
        on_more_verbose(libc::SIGUSR1);
        on_less_verbose(libc::SIGUSR2);
        assert_eq!(take_pending_delta(), 1);
        assert_eq!(take_pending_delta(), 0);
    }

    #[test]
    fn arming_succeeds() {
        arm_verbosity_signals().unwrap();
    }
}
