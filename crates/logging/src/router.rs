//! crates/logging/src/router.rs
//! The engine façade: one object owning the registry lock, the
//! severity table, the header format, the cleanup stack, and the
//! dispatch path. Constructed explicitly for harnesses; a process-wide
//! instance behind `OnceLock` serves the logging macros.

use std::fmt;
use std::io::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use arc_swap::ArcSwap;
use logging_core::{
    Component, FieldsError, HeaderLevel, HeaderTemplate, LogFields, LogLevel, ProcessIdent,
    ALL_COMPONENTS,
};
use logging_sink::{CaptureSink, LogSink};
use thiserror::Error;

use crate::assemble::{assemble, CallSite, FormatState};
use crate::cleanup::{CleanupStack, FatalAction};
use crate::context::{self, ContextKind};
use crate::registry::{Destination, Facility, RegistryError, RegistryState};
use crate::severity::SeverityTable;

/// Name of the built-in syslog facility.
pub const SYSLOG_FACILITY: &str = "SYSLOG";
/// Name of the built-in file facility.
pub const FILE_FACILITY: &str = "FILE";
/// Name of the built-in stderr facility.
pub const STDERR_FACILITY: &str = "STDERR";
/// Name of the built-in stdout facility.
pub const STDOUT_FACILITY: &str = "STDOUT";
/// Name reserved for the harness capture facility.
pub const TEST_FACILITY: &str = "TEST";

/// Error raised by [`init`].
#[derive(Debug, Error)]
pub enum InitError {
    /// `init` ran twice in one process.
    #[error("logging already initialized")]
    AlreadyInitialized,
    /// Registering the built-in facilities failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The logging engine.
///
/// Owns every piece of shared state: the facility registry behind one
/// `RwLock` (read for dispatch, write for mutation), the severity
/// table and header format behind atomic swaps, the process identity,
/// and the fatal cleanup stack. All methods take `&self`; the router
/// is shared freely across threads.
pub struct LogRouter {
    ident: ProcessIdent,
    registry: RwLock<RegistryState>,
    severity: ArcSwap<SeverityTable>,
    /// Serializes severity writers; readers go through the swap alone.
    severity_write: Mutex<()>,
    format: ArcSwap<FormatState>,
    cleanup: CleanupStack,
    fatal: FatalAction,
}

impl fmt::Debug for LogRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRouter")
            .field("program", &self.ident.program)
            .finish_non_exhaustive()
    }
}

impl LogRouter {
    /// New engine with startup defaults and no facilities.
    #[must_use]
    pub fn new(program: &str) -> Self {
        let ident = ProcessIdent::capture(program);
        let fields = LogFields::default();
        let template = HeaderTemplate::build(&fields, &ident);
        Self {
            ident,
            registry: RwLock::new(RegistryState::new()),
            severity: ArcSwap::from_pointee(SeverityTable::default()),
            severity_write: Mutex::new(()),
            format: ArcSwap::from_pointee(FormatState { fields, template }),
            cleanup: CleanupStack::default(),
            fatal: FatalAction::exit_process(),
        }
    }

    /// Replace the process-termination step of fatal dispatch.
    ///
    /// Harnesses substitute a recording action so fatal behavior can
    /// be asserted without ending the test process.
    #[must_use]
    pub fn with_fatal_action(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.fatal = FatalAction::custom(action);
        self
    }

    /// Identity stamped into record headers.
    #[must_use]
    pub const fn ident(&self) -> &ProcessIdent {
        &self.ident
    }

    // ---- facility registry -------------------------------------------------

    fn registry_read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a facility delivering to a destination. The sink is
    /// built (file paths validated) before the registry is touched.
    pub fn register_facility(
        &self,
        name: &str,
        destination: Destination,
        ceiling: LogLevel,
        headers: Option<HeaderLevel>,
    ) -> Result<(), RegistryError> {
        let headers = headers.unwrap_or_else(|| destination.default_headers());
        let sink = destination.open(&self.ident.program)?;
        self.registry_write()
            .register(name, Some(destination), sink, ceiling, headers)
    }

    /// Register a facility with a caller-supplied sink.
    pub fn register_sink(
        &self,
        name: &str,
        sink: Arc<dyn LogSink>,
        ceiling: LogLevel,
        headers: HeaderLevel,
    ) -> Result<(), RegistryError> {
        self.registry_write()
            .register(name, None, sink, ceiling, headers)
    }

    /// Ensure a facility name exists, as a placeholder if need be.
    pub fn create_placeholder(&self, name: &str) {
        self.registry_write().create_placeholder(name, None);
    }

    /// Complete a placeholder with its real sink.
    pub fn promote_custom(
        &self,
        name: &str,
        sink: Arc<dyn LogSink>,
        headers: HeaderLevel,
    ) -> Result<(), RegistryError> {
        self.registry_write().promote_custom(name, sink, headers)
    }

    /// Remove a facility entirely.
    pub fn release_facility(&self, name: &str) -> Result<(), RegistryError> {
        self.registry_write().release(name)
    }

    /// Add a facility to the active fan-out set.
    pub fn activate_facility(&self, name: &str) -> Result<(), RegistryError> {
        self.registry_write().activate(name)
    }

    /// Remove a facility from the active fan-out set.
    pub fn deactivate_facility(&self, name: &str) -> Result<(), RegistryError> {
        self.registry_write().deactivate(name)
    }

    /// Promote a facility to default, demoting the previous default.
    pub fn set_default_facility(&self, name: &str) -> Result<(), RegistryError> {
        self.registry_write().set_default(name)
    }

    /// Replace a facility's severity ceiling.
    pub fn set_facility_ceiling(&self, name: &str, ceiling: LogLevel) -> Result<(), RegistryError> {
        self.registry_write().set_ceiling(name, ceiling)
    }

    /// Repoint a facility at a new destination.
    pub fn set_facility_destination(
        &self,
        name: &str,
        destination: Destination,
    ) -> Result<(), RegistryError> {
        self.registry_write()
            .set_destination(name, destination, &self.ident.program)
    }

    /// Replace a facility's header verbosity.
    pub fn set_facility_headers(
        &self,
        name: &str,
        headers: HeaderLevel,
    ) -> Result<(), RegistryError> {
        self.registry_write().set_headers(name, headers)
    }

    /// Snapshot of a facility, case-insensitive lookup.
    #[must_use]
    pub fn facility(&self, name: &str) -> Option<Facility> {
        self.registry_read().find(name).cloned()
    }

    /// Whether a facility is in the active fan-out set.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.registry_read().is_active(name)
    }

    /// Name of the current default facility.
    #[must_use]
    pub fn default_facility(&self) -> Option<String> {
        self.registry_read().default_name().map(str::to_string)
    }

    /// Highest header verbosity any active facility wants.
    #[must_use]
    pub fn max_headers(&self) -> HeaderLevel {
        self.registry_read().max_headers()
    }

    /// Register and activate the harness capture facility, returning
    /// the shared capture handle.
    pub fn attach_test_capture(&self) -> Result<CaptureSink, RegistryError> {
        let capture = CaptureSink::new();
        self.register_sink(
            TEST_FACILITY,
            Arc::new(capture.clone()),
            LogLevel::FullDebug,
            HeaderLevel::None,
        )?;
        self.activate_facility(TEST_FACILITY)?;
        Ok(capture)
    }

    // ---- header format -----------------------------------------------------

    /// Swap in a new header layout, rebuilding the constant template.
    pub fn set_fields(&self, fields: LogFields) -> Result<(), FieldsError> {
        fields.validate()?;
        let template = HeaderTemplate::build(&fields, &self.ident);
        self.format.store(Arc::new(FormatState { fields, template }));
        Ok(())
    }

    /// Snapshot of the current header layout.
    #[must_use]
    pub fn fields(&self) -> LogFields {
        self.format.load().fields.clone()
    }

    // ---- severity table ----------------------------------------------------

    /// Current level of a component, signal bumps applied.
    #[must_use]
    pub fn component_level(&self, component: Component) -> LogLevel {
        self.apply_pending_delta();
        self.severity.load().level(component)
    }

    /// Whether a record would pass the component gate right now.
    #[must_use]
    pub fn would_log(&self, component: Component, level: LogLevel) -> bool {
        self.apply_pending_delta();
        self.severity.load().would_log(component, level)
    }

    /// Set a component's level; [`Component::All`] broadcasts.
    ///
    /// Components pinned by the environment keep their level and the
    /// refusal is reported through the engine itself. Real changes are
    /// reported only while the engine's own component sits at full
    /// debug verbosity.
    pub fn set_component_level(&self, component: Component, level: LogLevel) {
        let (changes, locked) = {
            let _writer = self
                .severity_write
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let outcome = self.severity.load().apply_level(component, level, true);
            self.severity.store(Arc::new(outcome.table));
            (outcome.changes, outcome.locked)
        };
        for refused in locked {
            self.log_internal(
                Component::Config,
                LogLevel::Warn,
                format_args!(
                    "log level of {refused} is pinned by the environment, ignoring {level}"
                ),
            );
        }
        if component == Component::All {
            if !changes.is_empty() {
                self.log_changes(format_args!(
                    "setting log level for all components to {level}"
                ));
            }
        } else {
            for change in changes {
                self.log_changes(format_args!(
                    "changing log level of {} from {} to {}",
                    change.component, change.from, change.to
                ));
            }
        }
    }

    /// Apply level overrides from the environment.
    ///
    /// For each component, a variable named after it (`COMPONENT_*`)
    /// holding any accepted level token sets the level and pins it
    /// against later configuration. Unparseable values are reported
    /// and skipped without pinning.
    pub fn load_environment_levels(&self) {
        let mut invalid = Vec::new();
        {
            let _writer = self
                .severity_write
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let mut table = SeverityTable::clone(&self.severity.load());
            for component in ALL_COMPONENTS {
                if let Ok(value) = std::env::var(component.as_str()) {
                    match LogLevel::from_name(&value) {
                        Some(level) => table = table.apply_env_level(component, level),
                        None => invalid.push((component, value)),
                    }
                }
            }
            self.severity.store(Arc::new(table));
        }
        for (component, value) in invalid {
            self.log_internal(
                Component::Config,
                LogLevel::Warn,
                format_args!("ignoring invalid log level {value:?} in environment variable {component}"),
            );
        }
    }

    /// Move the broadcast level by `delta` steps, clamped. Positive is
    /// more verbose. This is the operation SIGUSR1/SIGUSR2 feed.
    pub fn bump_verbosity(&self, delta: i32) {
        if delta == 0 {
            return;
        }
        let reached = {
            let _writer = self
                .severity_write
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let outcome = self.severity.load().apply_bump(delta);
            let reached = outcome.table.level(Component::All);
            self.severity.store(Arc::new(outcome.table));
            reached
        };
        self.log_changes(format_args!(
            "adjusted log level for all components to {reached}"
        ));
    }

    #[cfg(unix)]
    fn apply_pending_delta(&self) {
        let delta = crate::signal::take_pending_delta();
        if delta != 0 {
            self.bump_verbosity(delta);
        }
    }

    #[cfg(not(unix))]
    fn apply_pending_delta(&self) {}

    // ---- cleanup and fatal -------------------------------------------------

    /// Push a teardown hook; hooks run newest-first on fatal dispatch.
    pub fn register_cleanup(&self, hook: Box<dyn FnOnce() + Send>) {
        self.cleanup.register(hook);
    }

    // ---- dispatch ----------------------------------------------------------

    /// Deliver one record to every active facility whose ceiling
    /// admits it.
    ///
    /// This is the ungated primitive: the component gate belongs to
    /// the macros (and [`LogRouter::would_log`]) so filtered-out calls
    /// never pay for formatting. Never returns an error; sink failures
    /// go to the stderr side channel and the facility stays active. A
    /// fatal record runs the cleanup stack and then terminates the
    /// process with exit code 2.
    pub fn dispatch(
        &self,
        component: Component,
        level: LogLevel,
        site: CallSite<'_>,
        args: fmt::Arguments<'_>,
    ) {
        self.apply_pending_delta();
        let format = self.format.load_full();
        let mut failures: Vec<String> = Vec::new();

        let ((), kind) = context::with_buffer(|buf, thread_name| {
            let registry = self.registry_read();
            assemble(
                buf,
                &format,
                registry.max_headers(),
                thread_name,
                component,
                level,
                site,
                args,
            );
            let view = buf.view();
            for facility in registry.active_facilities() {
                if !level.passes(facility.ceiling()) {
                    continue;
                }
                let Some(sink) = facility.sink() else {
                    continue;
                };
                if let Err(err) = sink.emit(level, view, facility.headers()) {
                    failures.push(format!(
                        "log: delivery to facility {} failed: {err}",
                        facility.name()
                    ));
                }
            }
        });

        for line in failures {
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
        if kind == ContextKind::Emergency && component != Component::LogEmergency {
            let _ = writeln!(
                std::io::stderr().lock(),
                "log: thread context unavailable, record went through the emergency context"
            );
        }

        if level == LogLevel::Fatal {
            self.cleanup.run_all();
            self.fatal.run();
        }
    }

    /// Gated self-diagnostic on behalf of the engine.
    pub(crate) fn log_internal(
        &self,
        component: Component,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) {
        if self.severity.load().would_log(component, level) {
            self.dispatch(
                component,
                level,
                CallSite {
                    file: file!(),
                    line: line!(),
                    function: "logging::router",
                },
                args,
            );
        }
    }

    /// Level-change report, emitted only while the engine's own
    /// component runs at full debug verbosity.
    fn log_changes(&self, args: fmt::Arguments<'_>) {
        if self.severity.load().level(Component::Log) == LogLevel::FullDebug {
            self.dispatch(
                Component::Log,
                LogLevel::Null,
                CallSite {
                    file: file!(),
                    line: line!(),
                    function: "logging::router",
                },
                args,
            );
        }
    }

    // ---- startup -----------------------------------------------------------

    /// Register and wire the built-in facilities.
    ///
    /// STDERR comes first and starts as the default so the engine can
    /// report from the earliest moment; then STDOUT and SYSLOG are
    /// registered idle. With a log path the FILE facility becomes the
    /// default; without one, or when the path is unusable, SYSLOG
    /// does.
    pub fn bootstrap(
        &self,
        log_path: Option<&Path>,
        debug_level: Option<LogLevel>,
    ) -> Result<(), RegistryError> {
        self.register_facility(
            STDERR_FACILITY,
            Destination::Stderr,
            LogLevel::FullDebug,
            None,
        )?;
        self.set_default_facility(STDERR_FACILITY)?;
        self.register_facility(
            STDOUT_FACILITY,
            Destination::Stdout,
            LogLevel::FullDebug,
            None,
        )?;
        self.register_facility(
            SYSLOG_FACILITY,
            Destination::Syslog,
            LogLevel::FullDebug,
            None,
        )?;

        match log_path {
            Some(path) => {
                let file = self.register_facility(
                    FILE_FACILITY,
                    Destination::File(path.to_path_buf()),
                    LogLevel::FullDebug,
                    None,
                );
                match file {
                    Ok(()) => self.set_default_facility(FILE_FACILITY)?,
                    Err(err) => {
                        self.set_default_facility(SYSLOG_FACILITY)?;
                        self.log_internal(
                            Component::Log,
                            LogLevel::Crit,
                            format_args!(
                                "cannot log to {}, falling back to syslog: {err}",
                                path.display()
                            ),
                        );
                    }
                }
            }
            None => self.set_default_facility(SYSLOG_FACILITY)?,
        }

        if let Some(level) = debug_level {
            self.set_component_level(Component::All, level);
        }
        self.load_environment_levels();

        #[cfg(unix)]
        if let Err(err) = crate::signal::arm_verbosity_signals() {
            self.log_internal(
                Component::Log,
                LogLevel::Warn,
                format_args!("cannot arm verbosity signals: {err}"),
            );
        }
        Ok(())
    }
}

static GLOBAL: OnceLock<LogRouter> = OnceLock::new();

/// The process-wide router, once [`init`] has run.
#[must_use]
pub fn global() -> Option<&'static LogRouter> {
    GLOBAL.get()
}

/// Initialize process-wide logging.
///
/// Builds the router, registers the built-in facilities, applies the
/// optional startup debug level as a broadcast, loads environment
/// overrides, and arms the verbosity signals. May run once per
/// process.
pub fn init(
    program: &str,
    log_path: Option<&Path>,
    debug_level: Option<LogLevel>,
) -> Result<&'static LogRouter, InitError> {
    let router = LogRouter::new(program);
    router.bootstrap(log_path, debug_level)?;
    if GLOBAL.set(router).is_err() {
        return Err(InitError::AlreadyInitialized);
    }
    GLOBAL.get().ok_or(InitError::AlreadyInitialized)
}
