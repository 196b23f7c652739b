use crate::combat::{DefenseType, SpellSchool};
use crate::dot::DotTag;
use crate::state::UnitId;

/// Everything a defender needs to decide how much of a hit gets through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MitigationQuery {
    pub attacker: UnitId,
    pub target: UnitId,
    pub school: SpellSchool,
    pub defense: DefenseType,
    /// True for periodic ticks.
    pub periodic: bool,
    pub tag: Option<DotTag>,
}

/// School- and defense-aware mitigation step owned by the defender side.
pub trait MitigationOracle: Send + Sync {
    /// Fraction of raw damage that reaches the target, in `[0, 1]` for
    /// reductions and above one for vulnerabilities.
    fn damage_taken(&self, query: &MitigationQuery) -> f64;
}
