//! crates/logging/src/macros.rs
//! Logging front-end macros. Each captures the call site, checks the
//! component gate before any formatting, and hands the record to the
//! process-wide router. All of them are no-ops until [`crate::init`]
//! has run.

/// Log at an explicit severity.
///
/// The component gate runs before the format arguments are evaluated,
/// so a filtered-out call costs one atomic load.
///
/// # Examples
///
/// ```
/// use logging::{log_at, Component, LogLevel};
///
/// log_at!(Component::Net, LogLevel::Event, "listening on {}", 2049);
/// ```
#[macro_export]
macro_rules! log_at {
    ($component:expr, $level:expr, $($arg:tt)+) => {{
        if let Some(router) = $crate::global() {
            let component = $component;
            let level = $level;
            if router.would_log(component, level) {
                router.dispatch(
                    component,
                    level,
                    $crate::CallSite {
                        file: file!(),
                        line: line!(),
                        function: module_path!(),
                    },
                    format_args!($($arg)+),
                );
            }
        }
    }};
}

/// Log a major failure.
#[macro_export]
macro_rules! log_major {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Major, $($arg)+)
    };
}

/// Log a serious error.
#[macro_export]
macro_rules! log_crit {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Crit, $($arg)+)
    };
}

/// Log a warning.
#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log a significant operational event.
#[macro_export]
macro_rules! log_event {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Event, $($arg)+)
    };
}

/// Log informational detail.
#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log developer diagnostics.
#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log verbose developer diagnostics.
#[macro_export]
macro_rules! log_mid_debug {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::MidDebug, $($arg)+)
    };
}

/// Log at maximum verbosity.
#[macro_export]
macro_rules! log_full_debug {
    ($component:expr, $($arg:tt)+) => {
        $crate::log_at!($component, $crate::LogLevel::FullDebug, $($arg)+)
    };
}

/// Log an unrecoverable error and terminate the process.
///
/// Fatal records skip the component gate: after delivery the cleanup
/// hooks run and the process exits with code 2. Before [`crate::init`]
/// has run the record goes to stderr and the process still exits.
#[macro_export]
macro_rules! log_fatal {
    ($component:expr, $($arg:tt)+) => {{
        match $crate::global() {
            Some(router) => router.dispatch(
                $component,
                $crate::LogLevel::Fatal,
                $crate::CallSite {
                    file: file!(),
                    line: line!(),
                    function: module_path!(),
                },
                format_args!($($arg)+),
            ),
            None => {
                ::std::eprintln!(
                    "fatal before logging initialization: {}",
                    ::std::format_args!($($arg)+)
                );
                ::std::process::exit(2);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Component, LogLevel};

    // The macros resolve through the process-wide router, which these
    // unit tests leave uninitialized; expansion must still compile and
    // the gate must keep arguments unevaluated.
    #[test]
    fn macros_are_noops_before_init() {
        log_event!(Component::Net, "value {}", 1);
        log_warn!(Component::Cache, "value {}", 2);
        log_at!(Component::Main, LogLevel::MidDebug, "value {}", 3);
    }

    #[test]
    fn arguments_are_lazy() {
        let mut evaluated = false;
        log_full_debug!(Component::Net, "{}", {
            evaluated = true;
            "x"
        });
        assert!(!evaluated);
    }
}
