//! Events the engine hands to the scheduler and receives back when due.

use crate::dot::DotHandle;
use crate::state::{Timestamp, UnitId};
use crate::stats::ResourceKind;

/// Ordering class of an event at a given timestamp.
///
/// At equal timestamps, cast completions run before periodic ticks, and ticks
/// before externally scheduled regeneration. A tick therefore never observes
/// state changed by something else scheduled for the same instant except a
/// cast completing at that instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPhase {
    CastComplete = 0,
    DotTick = 1,
    ResourceRegen = 2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    /// The caster's pending cast has finished its cast time.
    CastComplete { caster: UnitId },
    DotTick { handle: DotHandle },
    /// Regeneration scheduled by the caller; the core never schedules it.
    ResourceRegen {
        unit: UnitId,
        kind: ResourceKind,
        amount: f64,
    },
}

impl SimEvent {
    pub const fn phase(&self) -> EventPhase {
        match self {
            Self::CastComplete { .. } => EventPhase::CastComplete,
            Self::DotTick { .. } => EventPhase::DotTick,
            Self::ResourceRegen { .. } => EventPhase::ResourceRegen,
        }
    }
}

/// An event together with the time it is due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub at: Timestamp,
    pub event: SimEvent,
}

impl ScheduledEvent {
    pub fn new(at: Timestamp, event: SimEvent) -> Self {
        Self { at, event }
    }

    /// Key the scheduler must order by (ties broken by insertion order).
    pub fn order_key(&self) -> (Timestamp, EventPhase) {
        (self.at, self.event.phase())
    }
}
