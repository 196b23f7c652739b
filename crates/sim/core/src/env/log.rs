//! Fire-and-forget combat log.
//!
//! The engine reports cast attempts, outcomes, damage and periodic effect
//! lifecycle here. `record` takes `&self` and returns nothing, so a failing
//! sink cannot reach back into simulation state.

use crate::combat::Outcome;
use crate::dot::DotKey;
use crate::engine::DamageRecord;
use crate::spell::CastState;
use crate::state::{ActionId, Timestamp, UnitId};
use crate::stats::ResourceKind;

#[derive(Clone, Debug, PartialEq)]
pub enum CombatLogEntry {
    CastStarted {
        at: Timestamp,
        caster: UnitId,
        spell: ActionId,
        target: UnitId,
        cast_time_ms: u64,
    },
    CastRejected {
        at: Timestamp,
        caster: UnitId,
        spell: ActionId,
        code: &'static str,
    },
    CastResolved {
        at: Timestamp,
        caster: UnitId,
        spell: ActionId,
        target: UnitId,
        outcome: Outcome,
        state: CastState,
    },
    Damage(DamageRecord),
    DotApplied {
        at: Timestamp,
        key: DotKey,
        ticks: u32,
        per_tick: f64,
        refreshed: bool,
    },
    DotExpired {
        at: Timestamp,
        key: DotKey,
    },
    DotCancelled {
        at: Timestamp,
        key: DotKey,
    },
    ResourceChanged {
        at: Timestamp,
        unit: UnitId,
        kind: ResourceKind,
        delta: f64,
    },
    SideEffectFailed {
        at: Timestamp,
        caster: UnitId,
        spell: ActionId,
        code: &'static str,
    },
}

/// Sink for combat log entries.
pub trait CombatLog: Send + Sync {
    fn record(&self, entry: &CombatLogEntry);
}

impl<T: CombatLog + ?Sized> CombatLog for std::sync::Arc<T> {
    fn record(&self, entry: &CombatLogEntry) {
        (**self).record(entry);
    }
}
