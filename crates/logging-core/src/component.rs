//! crates/logging-core/src/component.rs
//! Subsystem identifiers that carry independent verbosity levels.

use std::fmt;

use thiserror::Error;

/// Error returned when a component name cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log component name: {0:?}")]
pub struct UnknownComponent(pub String);

/// Subsystem a log message is attributed to.
///
/// Each component owns one slot in the severity table. [`Component::All`]
/// is not a real subsystem: setting its level broadcasts to every other
/// slot, and it is never used to tag a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Component {
    /// Broadcast pseudo-component.
    All = 0,
    /// The logging engine itself.
    Log,
    /// Last-resort reports when the engine cannot use a thread context.
    LogEmergency,
    /// Configuration loading and commit.
    Config,
    /// Process startup and shutdown.
    Init,
    /// Main server loop.
    Main,
    /// Request dispatching.
    Dispatch,
    /// Network transport.
    Net,
    /// Wire protocol handling.
    Proto,
    /// Session lifecycle.
    Session,
    /// Per-client tracking.
    Client,
    /// Shared server state.
    State,
    /// Caching layers.
    Cache,
    /// Worker thread management.
    Thread,
    /// Administrative control surface.
    Control,
}

/// All components in table order, the broadcast slot first.
pub const ALL_COMPONENTS: [Component; Component::COUNT] = [
    Component::All,
    Component::Log,
    Component::LogEmergency,
    Component::Config,
    Component::Init,
    Component::Main,
    Component::Dispatch,
    Component::Net,
    Component::Proto,
    Component::Session,
    Component::Client,
    Component::State,
    Component::Cache,
    Component::Thread,
    Component::Control,
];

impl Component {
    /// Number of entries in the component table, broadcast slot included.
    pub const COUNT: usize = 15;

    /// Full symbolic name, also the environment variable consulted for
    /// a startup level override.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "COMPONENT_ALL",
            Self::Log => "COMPONENT_LOG",
            Self::LogEmergency => "COMPONENT_LOG_EMERG",
            Self::Config => "COMPONENT_CONFIG",
            Self::Init => "COMPONENT_INIT",
            Self::Main => "COMPONENT_MAIN",
            Self::Dispatch => "COMPONENT_DISPATCH",
            Self::Net => "COMPONENT_NET",
            Self::Proto => "COMPONENT_PROTO",
            Self::Session => "COMPONENT_SESSION",
            Self::Client => "COMPONENT_CLIENT",
            Self::State => "COMPONENT_STATE",
            Self::Cache => "COMPONENT_CACHE",
            Self::Thread => "COMPONENT_THREAD",
            Self::Control => "COMPONENT_CONTROL",
        }
    }

    /// Short name printed in the record header's component span.
    #[must_use]
    pub const fn short_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Log => "LOG",
            Self::LogEmergency => "LOG_EMERG",
            Self::Config => "CONFIG",
            Self::Init => "INIT",
            Self::Main => "MAIN",
            Self::Dispatch => "DISP",
            Self::Net => "NET",
            Self::Proto => "PROTO",
            Self::Session => "SESSION",
            Self::Client => "CLIENT",
            Self::State => "STATE",
            Self::Cache => "CACHE",
            Self::Thread => "THREAD",
            Self::Control => "CTRL",
        }
    }

    /// Position in the component table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Component at a table position, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_COMPONENTS.get(index).copied()
    }

    /// Resolve a full or short name, case-insensitively, with or
    /// without the `COMPONENT_` prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name
            .strip_prefix("COMPONENT_")
            .or_else(|| name.strip_prefix("component_"))
            .unwrap_or(name);
        ALL_COMPONENTS.into_iter().find(|comp| {
            let full = comp
                .as_str()
                .strip_prefix("COMPONENT_")
                .unwrap_or_else(|| comp.as_str());
            bare.eq_ignore_ascii_case(full) || bare.eq_ignore_ascii_case(comp.short_str())
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownComponent(s.to_string()))
    }
}
