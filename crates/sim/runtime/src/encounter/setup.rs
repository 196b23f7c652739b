use std::sync::Arc;

use sim_content::ScenarioDef;
use sim_core::{
    CombatEngine, CombatLog, ContinuousPool, Points, ResourcePools, SimConfig, Spellbook,
    Timestamp, UnitState,
};

use super::{Encounter, RegenRule};
use crate::error::{Result, RuntimeError};
use crate::oracle::{ArmorMitigation, OracleManager, Roster, StatTable};

impl Encounter {
    /// Builds units, oracles, regeneration and deaths from a scenario.
    ///
    /// The caster knows exactly the spells in `spells`. Targets enter the
    /// roster in file order, so the first one is the primary target.
    pub fn from_scenario(
        scenario: &ScenarioDef,
        spells: Spellbook,
        config: SimConfig,
        log: Box<dyn CombatLog>,
    ) -> Result<Self> {
        let caster = &scenario.caster;

        let stats = StatTable::new();
        stats.set_attacker(caster.unit_id(), caster.stats);
        let mut mitigation = ArmorMitigation::new();
        for target in &scenario.targets {
            stats.set_defender(target.unit_id(), target.defender);
            mitigation = mitigation.with_armor(target.unit_id(), target.armor);
        }
        let roster = Roster::new(scenario.targets.iter().map(|target| target.unit_id()));
        let oracles = OracleManager::new(Arc::new(stats), Arc::new(mitigation), Arc::new(roster));

        let mut pools = ResourcePools::empty();
        for pool in &caster.pools {
            if pool.kind.is_discrete() {
                return Err(RuntimeError::DiscretePool { kind: pool.kind });
            }
            pools = pools.with_pool(ContinuousPool::with_current(
                pool.kind,
                pool.current.unwrap_or(pool.max),
                pool.max,
            ));
        }
        let points = Points::new(caster.combo_points)?;
        let mut unit = UnitState::new(caster.unit_id(), pools.with_combo_points(points.get()));
        if caster.stealthed {
            unit = unit.with_stealth();
        }

        let mut engine = CombatEngine::with_spellbook(config, spells);
        engine.validate_spells()?;
        engine.add_unit(unit);
        for target in &scenario.targets {
            engine.add_unit(UnitState::target(target.unit_id()));
        }

        let mut encounter = Encounter::new(engine, oracles, log);
        for regen in &caster.regen {
            encounter.add_regen(RegenRule {
                unit: caster.unit_id(),
                kind: regen.kind,
                amount: regen.amount,
                interval_ms: regen.interval_ms,
            });
        }
        for target in &scenario.targets {
            if let Some(at) = target.dies_at_ms {
                encounter.schedule_death(target.unit_id(), Timestamp(at));
            }
        }
        tracing::info!(
            "Scenario {}: {} vs {} targets, {} spells",
            scenario.name,
            caster.unit_id(),
            scenario.targets.len(),
            encounter.engine().spells().len()
        );
        Ok(encounter)
    }
}
