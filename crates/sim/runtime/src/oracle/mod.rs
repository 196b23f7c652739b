//! Runtime implementations of the `sim-core` oracle traits.
//!
//! Stats and the roster change while an encounter runs (buffs, deaths), so
//! they sit behind locks. Mitigation and the RNG are fixed per encounter.
//! [`OracleManager`] bundles them and hands out [`SimEnv`] views.
mod mitigation;
mod rng;
mod roster;
mod stats;

use std::sync::Arc;

use sim_core::{CombatLog, SimEnv};

pub use mitigation::ArmorMitigation;
pub use rng::SeededRng;
pub use roster::Roster;
pub use stats::StatTable;

/// Owns every oracle an encounter needs.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) stats: Arc<StatTable>,
    pub(crate) mitigation: Arc<ArmorMitigation>,
    pub(crate) roster: Arc<Roster>,
    pub(crate) rng: SeededRng,
}

impl OracleManager {
    pub fn new(stats: Arc<StatTable>, mitigation: Arc<ArmorMitigation>, roster: Arc<Roster>) -> Self {
        Self {
            stats,
            mitigation,
            roster,
            rng: SeededRng,
        }
    }

    /// Borrows every oracle plus `log` as a core environment.
    pub fn as_sim_env<'a>(&'a self, log: &'a dyn CombatLog) -> SimEnv<'a> {
        SimEnv::with_all(
            self.stats.as_ref(),
            self.mitigation.as_ref(),
            self.roster.as_ref(),
            &self.rng,
            log,
        )
    }

    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    pub fn mitigation(&self) -> &ArmorMitigation {
        &self.mitigation
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}
