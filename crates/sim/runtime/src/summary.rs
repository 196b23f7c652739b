//! Per-spell damage accounting over a run.

use std::collections::BTreeMap;

use sim_core::{ActionId, CastReport, DamageRecord, Outcome, UnitId};

/// Totals for one spell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellDamage {
    pub casts: u32,
    pub landed: u32,
    pub misses: u32,
    pub hits: u32,
    pub crits: u32,
    pub ticks: u32,
    pub damage: f64,
    pub threat: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DamageSummary {
    spells: BTreeMap<ActionId, SpellDamage>,
    targets: BTreeMap<UnitId, f64>,
}

impl DamageSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_damage(&mut self, record: &DamageRecord) {
        let entry = self.spells.entry(record.spell).or_default();
        entry.damage += record.amount;
        entry.threat += record.threat;
        if record.periodic {
            entry.ticks += 1;
        } else if record.outcome == Outcome::Crit {
            entry.crits += 1;
        } else {
            entry.hits += 1;
        }
        *self.targets.entry(record.target).or_default() += record.amount;
    }

    /// Counts the cast and every damage record it carries. Child casts of a
    /// wrapper add damage under their own spell but no cast count.
    pub fn record_cast(&mut self, report: &CastReport) {
        if let Some(outcome) = report.outcome {
            let entry = self.spells.entry(report.spell).or_default();
            entry.casts += 1;
            if outcome.landed() {
                entry.landed += 1;
            } else {
                entry.misses += 1;
            }
        }
        for record in &report.damage {
            self.record_damage(record);
        }
    }

    pub fn spell(&self, spell: ActionId) -> Option<&SpellDamage> {
        self.spells.get(&spell)
    }

    pub fn spells(&self) -> impl Iterator<Item = (ActionId, &SpellDamage)> {
        self.spells.iter().map(|(id, damage)| (*id, damage))
    }

    pub fn damage_to(&self, target: UnitId) -> f64 {
        self.targets.get(&target).copied().unwrap_or(0.0)
    }

    pub fn total_damage(&self) -> f64 {
        self.spells.values().map(|spell| spell.damage).sum()
    }

    pub fn total_threat(&self) -> f64 {
        self.spells.values().map(|spell| spell.threat).sum()
    }

    /// Damage per second over `duration_ms`; zero for an empty window.
    pub fn dps(&self, duration_ms: u64) -> f64 {
        if duration_ms == 0 {
            return 0.0;
        }
        self.total_damage() * 1_000.0 / duration_ms as f64
    }
}
