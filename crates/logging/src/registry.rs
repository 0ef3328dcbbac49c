//! crates/logging/src/registry.rs
//! The facility registry: named delivery targets, the activation
//! order, the protected default, and the derived header ceiling.
//!
//! All state lives in one [`RegistryState`] behind the router's
//! `RwLock`. Dispatch holds the read side while fanning out; every
//! mutation here runs under the write side, and callers emit any
//! self-diagnostic only after the guard drops.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use logging_core::{HeaderLevel, LogLevel};
use logging_sink::{FileSink, LogSink, SinkError, StreamSink};
use thiserror::Error;

/// Error raised by a registry operation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A real facility of that name already exists.
    #[error("log facility {0:?} already exists")]
    Duplicate(String),
    /// No facility of that name exists.
    #[error("no log facility named {0:?}")]
    NotFound(String),
    /// The operation would leave the engine without its default route.
    #[error("log facility {0:?} is the default and cannot be removed or disabled")]
    DefaultProtected(String),
    /// Building the sink for a destination failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Where a facility delivers its records.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// The system logger.
    Syslog,
    /// An append-mode file.
    File(PathBuf),
}

impl Destination {
    /// Map a destination string: `stdout`, `stderr`, and `syslog`
    /// (case-insensitive) are the streams and the system logger,
    /// anything else is a file path.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("stdout") {
            Self::Stdout
        } else if token.eq_ignore_ascii_case("stderr") {
            Self::Stderr
        } else if token.eq_ignore_ascii_case("syslog") {
            Self::Syslog
        } else {
            Self::File(PathBuf::from(token))
        }
    }

    /// Header verbosity a facility gets when the configuration does
    /// not say: full headers, except syslog which supplies its own
    /// timestamp and identity.
    #[must_use]
    pub const fn default_headers(&self) -> HeaderLevel {
        match self {
            Self::Syslog => HeaderLevel::Component,
            _ => HeaderLevel::All,
        }
    }

    /// Build the sink for this destination. File destinations are
    /// validated here, before any registry state changes.
    pub fn open(&self, tag: &str) -> Result<Arc<dyn LogSink>, SinkError> {
        match self {
            Self::Stdout => Ok(Arc::new(StreamSink::stdout())),
            Self::Stderr => Ok(Arc::new(StreamSink::stderr())),
            #[cfg(unix)]
            Self::Syslog => Ok(Arc::new(logging_sink::SyslogSink::open(
                logging_sink::SyslogFacility::User,
                tag,
            ))),
            #[cfg(not(unix))]
            Self::Syslog => {
                let _ = tag;
                Ok(Arc::new(StreamSink::stderr()))
            }
            Self::File(path) => Ok(Arc::new(FileSink::create(path)?)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::Syslog => f.write_str("syslog"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One named delivery target.
///
/// A facility without a sink is a placeholder: configuration referred
/// to a name before the owning subsystem registered the real sink.
/// Placeholders hold ceiling and activation state but deliver nothing.
#[derive(Clone)]
pub struct Facility {
    name: String,
    ceiling: LogLevel,
    headers: HeaderLevel,
    sink: Option<Arc<dyn LogSink>>,
    destination: Option<Destination>,
}

impl Facility {
    /// Facility name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Severity ceiling; records above it are skipped.
    #[must_use]
    pub const fn ceiling(&self) -> LogLevel {
        self.ceiling
    }

    /// Header verbosity this facility wants.
    #[must_use]
    pub const fn headers(&self) -> HeaderLevel {
        self.headers
    }

    /// Whether this is a placeholder awaiting its real sink.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.sink.is_none()
    }

    /// Destination description, when known.
    #[must_use]
    pub const fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub(crate) fn sink(&self) -> Option<&Arc<dyn LogSink>> {
        self.sink.as_ref()
    }
}

impl fmt::Debug for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facility")
            .field("name", &self.name)
            .field("ceiling", &self.ceiling)
            .field("headers", &self.headers)
            .field("placeholder", &self.is_placeholder())
            .field("destination", &self.destination)
            .finish()
    }
}

/// Registry state: every known facility, the activation order, the
/// default name, and the derived maximum header verbosity.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    facilities: Vec<Facility>,
    /// Names in activation order; dispatch iterates this.
    active: Vec<String>,
    default: Option<String>,
    max_headers: HeaderLevel,
}

impl RegistryState {
    pub fn new() -> Self {
        Self {
            facilities: Vec::new(),
            active: Vec::new(),
            default: None,
            // Nothing active yet, so no headers are needed.
            max_headers: HeaderLevel::None,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.facilities
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&Facility> {
        self.position(name).map(|i| &self.facilities[i])
    }

    /// Name of the current default facility.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Highest header verbosity any active facility wants.
    pub fn max_headers(&self) -> HeaderLevel {
        self.max_headers
    }

    /// Whether the facility is in the activation order.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Active facilities in activation order.
    pub fn active_facilities(&self) -> impl Iterator<Item = &Facility> {
        self.active.iter().filter_map(|name| self.find(name))
    }

    fn recompute_max_headers(&mut self) {
        self.max_headers = self
            .active
            .iter()
            .filter_map(|name| self.find(name))
            .map(Facility::headers)
            .max()
            .unwrap_or(HeaderLevel::None);
    }

    /// Register a real facility.
    ///
    /// Registering over a placeholder completes it: the placeholder's
    /// ceiling and activation membership carry forward, the sink and
    /// headers come from the caller. A second real registration of the
    /// same name is refused.
    pub fn register(
        &mut self,
        name: &str,
        destination: Option<Destination>,
        sink: Arc<dyn LogSink>,
        ceiling: LogLevel,
        headers: HeaderLevel,
    ) -> Result<(), RegistryError> {
        if let Some(i) = self.position(name) {
            if !self.facilities[i].is_placeholder() {
                return Err(RegistryError::Duplicate(name.to_string()));
            }
            let facility = &mut self.facilities[i];
            facility.sink = Some(sink);
            facility.headers = headers;
            if destination.is_some() {
                facility.destination = destination;
            }
            self.recompute_max_headers();
            return Ok(());
        }
        self.facilities.push(Facility {
            name: name.to_string(),
            ceiling,
            headers,
            sink: Some(sink),
            destination,
        });
        Ok(())
    }

    /// Ensure a facility of this name exists, creating a placeholder
    /// when it does not. Idempotent.
    pub fn create_placeholder(&mut self, name: &str, destination: Option<Destination>) {
        if self.position(name).is_none() {
            self.facilities.push(Facility {
                name: name.to_string(),
                ceiling: LogLevel::FullDebug,
                headers: destination
                    .as_ref()
                    .map_or(HeaderLevel::All, Destination::default_headers),
                sink: None,
                destination,
            });
        }
    }

    /// Complete a previously referenced facility with its real sink.
    /// Unlike [`RegistryState::register`], the name must already exist.
    pub fn promote_custom(
        &mut self,
        name: &str,
        sink: Arc<dyn LogSink>,
        headers: HeaderLevel,
    ) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if !self.facilities[i].is_placeholder() {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.facilities[i].sink = Some(sink);
        self.facilities[i].headers = headers;
        self.recompute_max_headers();
        Ok(())
    }

    /// Remove a facility entirely, deactivating it first. The default
    /// cannot be released.
    pub fn release(&mut self, name: &str) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if self
            .default
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(name))
        {
            return Err(RegistryError::DefaultProtected(name.to_string()));
        }
        self.active.retain(|n| !n.eq_ignore_ascii_case(name));
        self.facilities.remove(i);
        self.recompute_max_headers();
        Ok(())
    }

    /// Add the facility to the activation order. No-op when already
    /// active.
    pub fn activate(&mut self, name: &str) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if self.is_active(name) {
            return Ok(());
        }
        let headers = self.facilities[i].headers;
        self.active.push(self.facilities[i].name.clone());
        if headers > self.max_headers {
            self.max_headers = headers;
        }
        Ok(())
    }

    /// Remove the facility from the activation order. No-op when
    /// already inactive; the default cannot be deactivated.
    pub fn deactivate(&mut self, name: &str) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if !self.is_active(name) {
            return Ok(());
        }
        if self
            .default
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(name))
        {
            return Err(RegistryError::DefaultProtected(name.to_string()));
        }
        let headers = self.facilities[i].headers;
        self.active.retain(|n| !n.eq_ignore_ascii_case(name));
        // A cheaper rescan: only needed when this facility could have
        // been the one holding the ceiling up.
        if headers == self.max_headers {
            self.recompute_max_headers();
        }
        Ok(())
    }

    /// Make a facility the default: activate it, then demote and
    /// deactivate the previous default. One critical section, so
    /// dispatch never sees a defaultless registry after init.
    pub fn set_default(&mut self, name: &str) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let canonical = self.facilities[i].name.clone();
        if self
            .default
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(&canonical))
        {
            return Ok(());
        }
        self.activate(&canonical)?;
        let previous = self.default.replace(canonical);
        if let Some(previous) = previous {
            // Now demotable; failure here would mean the name vanished
            // while we held the write guard, which cannot happen.
            let _ = self.deactivate(&previous);
        }
        self.recompute_max_headers();
        Ok(())
    }

    /// Replace the ceiling of an existing facility.
    pub fn set_ceiling(&mut self, name: &str, ceiling: LogLevel) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.facilities[i].ceiling = ceiling;
        Ok(())
    }

    /// Repoint an existing facility at a new destination. The sink is
    /// built (and a file path validated) before any state changes;
    /// ceiling, headers, and activation stay as they are.
    pub fn set_destination(
        &mut self,
        name: &str,
        destination: Destination,
        tag: &str,
    ) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let sink = destination.open(tag)?;
        let facility = &mut self.facilities[i];
        facility.sink = Some(sink);
        facility.destination = Some(destination);
        Ok(())
    }

    /// Replace the header verbosity of an existing facility.
    pub fn set_headers(&mut self, name: &str, headers: HeaderLevel) -> Result<(), RegistryError> {
        let i = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.facilities[i].headers = headers;
        self.recompute_max_headers();
        Ok(())
    }
}
