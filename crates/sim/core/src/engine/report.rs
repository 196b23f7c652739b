//! Results handed back to the caller after a cast or an event.

use crate::combat::{Outcome, SpellSchool};
use crate::dot::DotKey;
use crate::engine::ScheduledEvent;
use crate::spell::{CastState, Points, ProcMask};
use crate::state::{ActionId, Timestamp, UnitId};
use crate::stats::ResourceKind;

/// One application of damage after every multiplier and mitigation step.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageRecord {
    pub at: Timestamp,
    pub caster: UnitId,
    pub target: UnitId,
    pub spell: ActionId,
    pub outcome: Outcome,
    pub school: SpellSchool,
    pub proc_mask: ProcMask,
    pub amount: f64,
    pub threat: f64,
    pub periodic: bool,
}

/// A secondary step that failed without affecting the rest of the cast.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectFailure {
    pub spell: ActionId,
    pub code: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CastReport {
    pub caster: UnitId,
    pub spell: ActionId,
    pub target: UnitId,
    pub state: CastState,
    pub outcome: Option<Outcome>,
    /// Resource deducted at cast start.
    pub paid: Option<(ResourceKind, f64)>,
    pub refunded: f64,
    /// Combo points the cast scaled from.
    pub points: Points,
    /// Combo points removed from the pool once the finisher landed.
    pub points_spent: u8,
    /// Outcomes of child casts made by wrapper effects.
    pub child_outcomes: Vec<(UnitId, Outcome)>,
    pub damage: Vec<DamageRecord>,
    pub scheduled: Vec<ScheduledEvent>,
    pub failures: Vec<EffectFailure>,
}

impl CastReport {
    pub fn new(caster: UnitId, spell: ActionId, target: UnitId, points: Points) -> Self {
        Self {
            caster,
            spell,
            target,
            state: CastState::Idle,
            outcome: None,
            paid: None,
            refunded: 0.0,
            points,
            points_spent: 0,
            child_outcomes: Vec::new(),
            damage: Vec::new(),
            scheduled: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_damage(&self) -> f64 {
        self.damage.iter().map(|record| record.amount).sum()
    }

    /// Folds a child cast's effects into this report.
    pub(crate) fn absorb(&mut self, child: CastReport) {
        if let Some(outcome) = child.outcome {
            self.child_outcomes.push((child.target, outcome));
        }
        self.damage.extend(child.damage);
        self.scheduled.extend(child.scheduled);
        self.failures.extend(child.failures);
    }
}

/// Result of [`crate::CombatEngine::fire_event`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventReport {
    /// Set when the event completed a cast.
    pub cast: Option<CastReport>,
    pub damage: Vec<DamageRecord>,
    pub scheduled: Vec<ScheduledEvent>,
    pub expired: Vec<DotKey>,
    pub cancelled: Vec<DotKey>,
    /// True when the event referred to something that no longer exists.
    pub stale: bool,
}

impl EventReport {
    pub fn stale() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }

    /// Every event the scheduler must register, including a completed cast's.
    pub fn scheduled_events(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.scheduled
            .iter()
            .chain(self.cast.iter().flat_map(|cast| cast.scheduled.iter()))
    }

    pub fn damage_records(&self) -> impl Iterator<Item = &DamageRecord> {
        self.damage
            .iter()
            .chain(self.cast.iter().flat_map(|cast| cast.damage.iter()))
    }
}
