use std::collections::BTreeMap;
use std::sync::RwLock;

use sim_core::{AttackerStats, DefenderStats, StatsOracle, UnitId};

/// Current stats of every unit. Writers apply buffs between events.
#[derive(Debug, Default)]
pub struct StatTable {
    attackers: RwLock<BTreeMap<UnitId, AttackerStats>>,
    defenders: RwLock<BTreeMap<UnitId, DefenderStats>>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attacker(&self, unit: UnitId, stats: AttackerStats) {
        if let Ok(mut attackers) = self.attackers.write() {
            attackers.insert(unit, stats);
        }
    }

    pub fn set_defender(&self, unit: UnitId, stats: DefenderStats) {
        if let Ok(mut defenders) = self.defenders.write() {
            defenders.insert(unit, stats);
        }
    }

    /// Applies `update` to the unit's attacker stats, if present.
    ///
    /// Only casts and periodic effects applied afterwards see the change;
    /// running periodic effects keep their snapshot.
    pub fn modify_attacker(&self, unit: UnitId, update: impl FnOnce(&mut AttackerStats)) -> bool {
        let Ok(mut attackers) = self.attackers.write() else {
            return false;
        };
        match attackers.get_mut(&unit) {
            Some(stats) => {
                update(stats);
                true
            }
            None => false,
        }
    }
}

impl StatsOracle for StatTable {
    fn attacker(&self, unit: UnitId) -> Option<AttackerStats> {
        self.attackers.read().ok()?.get(&unit).copied()
    }

    fn defender(&self, unit: UnitId) -> Option<DefenderStats> {
        self.defenders.read().ok()?.get(&unit).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_only_touches_known_units() {
        let table = StatTable::new();
        table.set_attacker(UnitId(1), AttackerStats::with_attack_power(1_000.0));

        assert!(table.modify_attacker(UnitId(1), |stats| stats.attack_power *= 1.1));
        assert!(!table.modify_attacker(UnitId(2), |stats| stats.attack_power = 5.0));
        assert_eq!(table.attacker(UnitId(1)).unwrap().attack_power, 1_100.0);
        assert_eq!(table.attacker(UnitId(2)), None);
    }
}
