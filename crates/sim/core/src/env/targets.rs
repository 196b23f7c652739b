use crate::state::UnitId;

/// Encounter roster, consulted by spells that hit every enemy.
pub trait TargetOracle: Send + Sync {
    /// Hostile units of `caster`, in a stable order.
    fn enemies_of(&self, caster: UnitId) -> Vec<UnitId>;
}
