//! Messages passed between the gesture controller and the ramp engine

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::ramp::RampRequest;
use crate::status::StatusCell;

/// Identifier of a command issued by the controller
///
/// Outcomes carry the id of the command they belong to, so the controller can
/// tell a stale report from the answer to its latest command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandId(u32);

impl CommandId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// What the ramp engine should do with the duty register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCommandKind {
    /// Sweep over time
    Ramp(RampRequest),
    /// Write a level immediately
    Set(u8),
}

/// Command for the ramp engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCommand {
    pub id: CommandId,
    pub kind: DutyCommandKind,
}

impl DutyCommand {
    pub const fn ramp(id: CommandId, request: RampRequest) -> Self {
        Self {
            id,
            kind: DutyCommandKind::Ramp(request),
        }
    }

    pub const fn set(id: CommandId, level: u8) -> Self {
        Self {
            id,
            kind: DutyCommandKind::Set(level),
        }
    }
}

/// Report from the ramp engine once a command stops writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampOutcome {
    /// Command ran to completion and the staged level is its target
    Settled { id: CommandId, level: u8 },
    /// A newer command preempted this one at `level`
    Interrupted { id: CommandId, level: u8 },
}

impl RampOutcome {
    pub const fn id(self) -> CommandId {
        match self {
            RampOutcome::Settled { id, .. } | RampOutcome::Interrupted { id, .. } => id,
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            RampOutcome::Settled { level, .. } | RampOutcome::Interrupted { level, .. } => level,
        }
    }
}

/// Type alias for the command signal (controller -> ramp engine)
///
/// Only the latest command matters, so a newer one overwrites a pending one.
pub type CommandSignal = Signal<CriticalSectionRawMutex, DutyCommand>;

/// Type alias for the outcome signal (ramp engine -> controller)
pub type OutcomeSignal = Signal<CriticalSectionRawMutex, RampOutcome>;

/// Shared state linking the dimmer tasks
///
/// Usually placed in a `static` so every task can borrow it for `'static`.
pub struct DimmerBus {
    pub commands: CommandSignal,
    pub outcomes: OutcomeSignal,
    pub status: StatusCell,
}

impl DimmerBus {
    pub const fn new() -> Self {
        Self {
            commands: Signal::new(),
            outcomes: Signal::new(),
            status: StatusCell::new(),
        }
    }
}

impl Default for DimmerBus {
    fn default() -> Self {
        Self::new()
    }
}
