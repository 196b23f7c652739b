use crate::state::UnitId;
use crate::stats::{AttackerStats, DefenderStats};

/// Stat lookups for units taking part in an encounter.
///
/// The core only reads through this trait; it never writes stats back.
pub trait StatsOracle: Send + Sync {
    /// Offensive stats of `unit` right now.
    fn attacker(&self, unit: UnitId) -> Option<AttackerStats>;

    /// Avoidance stats of `unit` right now.
    fn defender(&self, unit: UnitId) -> Option<DefenderStats>;
}
