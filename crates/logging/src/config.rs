//! crates/logging/src/config.rs
//! Configuration value objects and the commit that applies them to a
//! running router.
//!
//! The configuration grammar lives elsewhere; a loader fills these
//! plain structs and calls [`LoggerConfig::apply`]. The commit is
//! best-effort per item: every error is reported through the engine
//! itself and counted, and the count surfaces at the end, so one bad
//! facility never blocks the rest of a reconfiguration.

use logging_core::{Component, HeaderLevel, LogFields, LogLevel};
use thiserror::Error;

use crate::registry::{Destination, RegistryError};
use crate::router::LogRouter;

/// Error summarizing a partially failed commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("logging configuration commit failed with {errors} error(s)")]
pub struct ConfigError {
    /// How many items could not be applied.
    pub errors: usize,
}

/// Desired activation state of a configured facility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacilityState {
    /// Registered but not in the fan-out set.
    #[default]
    Idle,
    /// In the fan-out set.
    Active,
    /// In the fan-out set as the default facility.
    Default,
}

/// One facility block from the configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilitySpec {
    /// Facility name, matched case-insensitively.
    pub name: String,
    /// Where the facility delivers. A new facility without a
    /// destination becomes a placeholder awaiting its real sink.
    pub destination: Option<Destination>,
    /// Severity ceiling; unset keeps the current (or startup) value.
    pub max_level: Option<LogLevel>,
    /// Header verbosity; unset derives from the destination.
    pub headers: Option<HeaderLevel>,
    /// Desired activation state.
    pub state: FacilityState,
}

/// The logging block of the server configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoggerConfig {
    /// Broadcast level for components not named in `components`.
    pub default_level: Option<LogLevel>,
    /// Facility blocks, applied in order.
    pub facilities: Vec<FacilitySpec>,
    /// Replacement header layout.
    pub fields: Option<LogFields>,
    /// Per-component levels. An entry for [`Component::All`] replaces
    /// `default_level` as the broadcast base.
    pub components: Vec<(Component, LogLevel)>,
}

impl LoggerConfig {
    /// Commit this configuration to a router.
    pub fn apply(&self, router: &LogRouter) -> Result<(), ConfigError> {
        let mut errors = 0_usize;

        for spec in &self.facilities {
            if let Err(err) = apply_facility(router, spec) {
                errors += 1;
                router.log_internal(
                    Component::Config,
                    LogLevel::Crit,
                    format_args!("cannot apply log facility {:?}: {err}", spec.name),
                );
            }
        }

        if let Some(fields) = &self.fields {
            match router.set_fields(fields.clone()) {
                Ok(()) => {}
                Err(err) => {
                    errors += 1;
                    router.log_internal(
                        Component::Config,
                        LogLevel::Crit,
                        format_args!("rejecting log format description: {err}"),
                    );
                }
            }
        }

        let broadcast = self
            .components
            .iter()
            .find(|(component, _)| *component == Component::All)
            .map(|(_, level)| *level)
            .or(self.default_level);
        if let Some(level) = broadcast {
            router.set_component_level(Component::All, level);
        }
        for (component, level) in &self.components {
            if *component != Component::All {
                router.set_component_level(*component, *level);
            }
        }

        if errors > 0 {
            Err(ConfigError { errors })
        } else {
            Ok(())
        }
    }
}

/// Create-or-modify one facility, then apply its state transition.
/// A facility created by this very block is released again when a
/// later step fails, so a failed block leaves no trace.
fn apply_facility(router: &LogRouter, spec: &FacilitySpec) -> Result<(), RegistryError> {
    let existed = router.facility(&spec.name).is_some();

    let applied = (|| {
        if existed {
            if let Some(destination) = &spec.destination {
                router.set_facility_destination(&spec.name, destination.clone())?;
            }
            if let Some(headers) = spec.headers {
                router.set_facility_headers(&spec.name, headers)?;
            }
        } else {
            match &spec.destination {
                Some(destination) => router.register_facility(
                    &spec.name,
                    destination.clone(),
                    spec.max_level.unwrap_or(LogLevel::FullDebug),
                    spec.headers,
                )?,
                None => router.create_placeholder(&spec.name),
            }
        }
        if let Some(ceiling) = spec.max_level {
            router.set_facility_ceiling(&spec.name, ceiling)?;
        }
        match spec.state {
            FacilityState::Idle => Ok(()),
            FacilityState::Active => router.activate_facility(&spec.name),
            FacilityState::Default => router.set_default_facility(&spec.name),
        }
    })();

    if applied.is_err() && !existed {
        let _ = router.release_facility(&spec.name);
    }
    applied
}
