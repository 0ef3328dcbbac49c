//! crates/logging/src/severity.rs
//! The per-component severity table. The table itself is a plain value
//! object; the router holds it in an `ArcSwap` and replaces it
//! wholesale so dispatch never observes a half-updated table.

use logging_core::{Component, LogLevel, ALL_COMPONENTS};

/// One applied level change, kept for the change diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelChange {
    pub component: Component,
    pub from: LogLevel,
    pub to: LogLevel,
}

/// Result of applying a level request to a snapshot of the table.
#[derive(Debug)]
pub(crate) struct ApplyOutcome {
    /// The replacement table.
    pub table: SeverityTable,
    /// Components whose level actually changed.
    pub changes: Vec<LevelChange>,
    /// Components skipped because the environment pinned their level.
    pub locked: Vec<Component>,
}

/// Per-component verbosity ceilings plus the environment-lock bits.
///
/// A message passes when its level is numerically at or below the
/// component's entry. The broadcast slot ([`Component::All`]) holds
/// the last broadcast value and is the base for signal bumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityTable {
    levels: [LogLevel; Component::COUNT],
    env_locked: [bool; Component::COUNT],
}

impl Default for SeverityTable {
    /// Early-startup defaults: every component at `NIV_EVENT`, the
    /// broadcast slot at `NIV_NULL`.
    fn default() -> Self {
        let mut levels = [LogLevel::Event; Component::COUNT];
        levels[Component::All.index()] = LogLevel::Null;
        Self {
            levels,
            env_locked: [false; Component::COUNT],
        }
    }
}

impl SeverityTable {
    /// Current level of a component.
    #[must_use]
    pub const fn level(&self, component: Component) -> LogLevel {
        self.levels[component.index()]
    }

    /// Whether the environment pinned this component's level.
    #[must_use]
    pub const fn is_env_locked(&self, component: Component) -> bool {
        self.env_locked[component.index()]
    }

    /// Whether a message would pass this table.
    #[must_use]
    pub const fn would_log(&self, component: Component, level: LogLevel) -> bool {
        level.passes(self.level(component))
    }

    /// New table with a level request applied.
    ///
    /// [`Component::All`] broadcasts to every slot; environment-locked
    /// slots keep their level (unless `respect_locks` is off, the env
    /// loader's own path) and are reported in the outcome.
    pub(crate) fn apply_level(
        &self,
        component: Component,
        level: LogLevel,
        respect_locks: bool,
    ) -> ApplyOutcome {
        let mut table = self.clone();
        let mut changes = Vec::new();
        let mut locked = Vec::new();

        let targets: &[Component] = if component == Component::All {
            &ALL_COMPONENTS
        } else {
            std::slice::from_ref(&ALL_COMPONENTS[component.index()])
        };
        for &target in targets {
            let slot = target.index();
            if respect_locks && table.env_locked[slot] {
                locked.push(target);
                continue;
            }
            let from = table.levels[slot];
            if from != level {
                table.levels[slot] = level;
                changes.push(LevelChange {
                    component: target,
                    from,
                    to: level,
                });
            }
        }
        ApplyOutcome {
            table,
            changes,
            locked,
        }
    }

    /// New table with an environment level applied and pinned.
    pub(crate) fn apply_env_level(&self, component: Component, level: LogLevel) -> Self {
        let mut outcome = self.apply_level(component, level, false);
        if component == Component::All {
            for slot in &mut outcome.table.env_locked {
                *slot = true;
            }
        } else {
            outcome.table.env_locked[component.index()] = true;
        }
        outcome.table
    }

    /// New table with the broadcast level moved by `delta` steps,
    /// clamped to the table bounds. Locked slots still move: the
    /// operator's signal outranks the environment pin.
    pub(crate) fn apply_bump(&self, delta: i32) -> ApplyOutcome {
        let target = self.level(Component::All).offset(delta);
        self.apply_level(Component::All, target, false)
    }
}
