use sim_content::RotationStep;
use sim_core::{ActionId, DotKey, StatsOracle, UnitId};

use super::Encounter;

/// Priority list of spells. The first step whose conditions hold is cast.
#[derive(Clone, Debug, Default)]
pub struct Rotation {
    steps: Vec<RotationStep>,
}

impl Rotation {
    pub fn new(steps: Vec<RotationStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RotationStep] {
        &self.steps
    }

    /// Picks the spell `caster` should cast on `target` right now.
    pub fn next(&self, encounter: &Encounter, caster: UnitId, target: UnitId) -> Option<ActionId> {
        let engine = encounter.engine();
        let unit = engine.unit(caster)?;
        let stats = encounter.oracles().stats().attacker(caster)?;
        let points = unit.pools.combo_points().current();

        self.steps.iter().find_map(|step| {
            let spell = engine.spells().get(step.action_id())?;
            if points < step.min_points || (step.requires_stealth && !unit.stealthed) {
                return None;
            }
            if let Some(dot) = step.keep_dot_up {
                let key = DotKey {
                    caster,
                    spell: ActionId(dot),
                    target,
                };
                if engine.dots().is_active(&key) {
                    return None;
                }
            }
            let affordable = spell.cost.as_ref().is_none_or(|cost| {
                unit.pools
                    .continuous(cost.kind)
                    .is_some_and(|pool| pool.can_afford(cost.amount(&stats)))
            });
            affordable.then_some(step.action_id())
        })
    }
}
