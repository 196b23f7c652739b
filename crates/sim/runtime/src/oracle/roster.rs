use std::sync::RwLock;

use sim_core::{TargetOracle, UnitId};

/// Hostile units in encounter order. Dead units are removed.
#[derive(Debug, Default)]
pub struct Roster {
    enemies: RwLock<Vec<UnitId>>,
}

impl Roster {
    pub fn new(enemies: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            enemies: RwLock::new(enemies.into_iter().collect()),
        }
    }

    pub fn remove(&self, unit: UnitId) -> bool {
        let Ok(mut enemies) = self.enemies.write() else {
            return false;
        };
        let before = enemies.len();
        enemies.retain(|enemy| *enemy != unit);
        enemies.len() != before
    }

    /// First living enemy, used as the rotation's primary target.
    pub fn primary(&self) -> Option<UnitId> {
        self.enemies.read().ok()?.first().copied()
    }

    pub fn len(&self) -> usize {
        self.enemies.read().map(|enemies| enemies.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TargetOracle for Roster {
    fn enemies_of(&self, caster: UnitId) -> Vec<UnitId> {
        self.enemies
            .read()
            .map(|enemies| {
                enemies
                    .iter()
                    .copied()
                    .filter(|enemy| *enemy != caster)
                    .collect()
            })
            .unwrap_or_default()
    }
}
