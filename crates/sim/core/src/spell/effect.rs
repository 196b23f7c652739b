//! Closed set of effect behaviours a spell can carry.
//!
//! Instead of arbitrary callbacks, every spell binds one [`EffectKind`]. The
//! engine dispatches on the variant, which keeps the cast state machine
//! exhaustive and lets each variant be tested on its own.

use crate::dot::{DotTag, RefreshPolicy};
use crate::spell::{ConfigError, PointTable, Points, TickFormula};
use crate::state::ActionId;
use crate::stats::{AttackerStats, ResourceKind};

/// Stat a damage formula scales with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingStat {
    AttackPower,
    SpellPower,
}

impl ScalingStat {
    pub fn read(self, stats: &AttackerStats) -> f64 {
        match self {
            Self::AttackPower => stats.attack_power,
            Self::SpellPower => stats.spell_power,
        }
    }
}

/// Inputs a damage formula reads at evaluation time.
pub struct DamageInput<'a> {
    pub stats: &'a AttackerStats,
    pub points: Points,
    /// Uniform draw in `[0, 1)` for ranged formulas; ignored otherwise.
    pub variance: f64,
    /// Whether the caster's periodic effect `spell` is ticking on the target.
    pub dot_active: &'a dyn Fn(ActionId) -> bool,
}

/// Unscaled damage formula, before spell and caster multipliers.
#[derive(Clone, Debug, PartialEq)]
pub enum BaseDamage {
    Fixed(f64),
    /// `coefficient * stat`.
    Scaled { stat: ScalingStat, coefficient: f64 },
    /// Uniform roll in `[min, max]` plus `coefficient * stat`.
    Range {
        min: f64,
        max: f64,
        stat: ScalingStat,
        coefficient: f64,
    },
    /// `table[points] * stat`.
    PerPoint {
        table: PointTable<f64>,
        stat: ScalingStat,
    },
    /// While the caster's `dot` ticks on the target: `(base + flat_bonus) * multiplier`.
    WhileDotActive {
        base: Box<BaseDamage>,
        dot: ActionId,
        flat_bonus: f64,
        multiplier: f64,
    },
}

impl BaseDamage {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Range { min, max, .. } if !(min.is_finite() && max.is_finite() && min <= max) => {
                Err(ConfigError::InvalidDamageRange {
                    min: *min,
                    max: *max,
                })
            }
            Self::WhileDotActive { base, .. } => base.validate(),
            _ => Ok(()),
        }
    }

    /// True if evaluation consumes a variance draw.
    pub fn needs_variance(&self) -> bool {
        match self {
            Self::Range { .. } => true,
            Self::WhileDotActive { base, .. } => base.needs_variance(),
            _ => false,
        }
    }

    pub fn evaluate(&self, input: &DamageInput<'_>) -> f64 {
        match self {
            Self::Fixed(amount) => *amount,
            Self::Scaled { stat, coefficient } => coefficient * stat.read(input.stats),
            Self::Range {
                min,
                max,
                stat,
                coefficient,
            } => min + (max - min) * input.variance + coefficient * stat.read(input.stats),
            Self::PerPoint { table, stat } => table.get(input.points) * stat.read(input.stats),
            Self::WhileDotActive {
                base,
                dot,
                flat_bonus,
                multiplier,
            } => {
                let amount = base.evaluate(input);
                if (input.dot_active)(*dot) {
                    (amount + flat_bonus) * multiplier
                } else {
                    amount
                }
            }
        }
    }
}

/// Periodic damage configuration: what one tick deals and how many there are.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicConfig {
    /// Evaluated once at apply time and frozen into the instance.
    pub per_tick: BaseDamage,
    pub ticks: TickFormula,
    pub interval_ms: u64,
    pub refresh: RefreshPolicy,
    pub tag: Option<DotTag>,
    /// Ticks roll for crit using the crit chance captured at apply time.
    pub can_crit: bool,
}

/// Which units a wrapper effect casts its child spell on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetScope {
    Primary,
    AllEnemies,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    DirectDamage { base: BaseDamage },
    PeriodicDamage(PeriodicConfig),
    ResourceGenerator { kind: ResourceKind, amount: f64 },
    /// Casts another registered spell, sharing this cast's combo points.
    /// Each child cast rolls its own outcome and pays no cost.
    CastOnTargets { spell: ActionId, scope: TargetScope },
    Composite(Vec<EffectKind>),
}

impl EffectKind {
    /// Fails on the first invalid nested configuration.
    pub fn validate(&self, spell: ActionId) -> Result<(), ConfigError> {
        match self {
            Self::DirectDamage { base } => base.validate(),
            Self::PeriodicDamage(periodic) => {
                if periodic.interval_ms == 0 {
                    return Err(ConfigError::ZeroTickInterval { spell });
                }
                periodic.ticks.validate()?;
                periodic.per_tick.validate()
            }
            Self::ResourceGenerator { .. } | Self::CastOnTargets { .. } => Ok(()),
            Self::Composite(children) => {
                if children.is_empty() {
                    return Err(ConfigError::EmptyComposite { spell });
                }
                children.iter().try_for_each(|child| child.validate(spell))
            }
        }
    }

    /// Spells this effect casts, for registry validation.
    pub fn referenced_spells(&self) -> Vec<ActionId> {
        match self {
            Self::CastOnTargets { spell, .. } => vec![*spell],
            Self::Composite(children) => children
                .iter()
                .flat_map(EffectKind::referenced_spells)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Secondary step run after the primary effect of a landed cast.
///
/// Each side effect fails on its own; a failure is logged and never undoes
/// the primary effect or the other side effects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SideEffect {
    BreakStealth,
    GainPoints(u8),
    RestoreResource { kind: ResourceKind, amount: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_dots(_: ActionId) -> bool {
        false
    }

    fn all_dots(_: ActionId) -> bool {
        true
    }

    fn input<'a>(stats: &'a AttackerStats, dot_active: &'a dyn Fn(ActionId) -> bool) -> DamageInput<'a> {
        DamageInput {
            stats,
            points: Points::new(2).unwrap(),
            variance: 0.5,
            dot_active,
        }
    }

    fn incinerate() -> BaseDamage {
        BaseDamage::WhileDotActive {
            base: Box::new(BaseDamage::Range {
                min: 582.0,
                max: 676.0,
                stat: ScalingStat::SpellPower,
                coefficient: 0.713,
            }),
            dot: ActionId(348),
            flat_bonus: 157.0,
            multiplier: 1.1,
        }
    }

    #[test]
    fn range_uses_variance_and_coefficient() {
        let stats = AttackerStats::with_spell_power(1_000.0);
        let amount = incinerate().evaluate(&input(&stats, &no_dots));
        assert!((amount - (629.0 + 713.0)).abs() < 1e-9);
    }

    #[test]
    fn conditional_bonus_applies_while_dot_ticks() {
        let stats = AttackerStats::with_spell_power(1_000.0);
        let amount = incinerate().evaluate(&input(&stats, &all_dots));
        assert!((amount - (629.0 + 713.0 + 157.0) * 1.1).abs() < 1e-9);
        assert!(incinerate().needs_variance());
    }

    #[test]
    fn per_point_reads_table() {
        let stats = AttackerStats::with_attack_power(1_000.0);
        let base = BaseDamage::PerPoint {
            table: PointTable::new(&[0.15, 0.3, 0.45, 0.6, 0.75, 0.9]).unwrap(),
            stat: ScalingStat::AttackPower,
        };
        assert_eq!(base.evaluate(&input(&stats, &no_dots)), 450.0);
    }

    #[test]
    fn inverted_range_fails_validation() {
        let base = BaseDamage::Range {
            min: 10.0,
            max: 5.0,
            stat: ScalingStat::SpellPower,
            coefficient: 0.0,
        };
        assert!(matches!(
            EffectKind::DirectDamage { base }.validate(ActionId(1)),
            Err(ConfigError::InvalidDamageRange { .. })
        ));
    }

    #[test]
    fn empty_composite_fails_validation() {
        assert_eq!(
            EffectKind::Composite(Vec::new()).validate(ActionId(7)),
            Err(ConfigError::EmptyComposite { spell: ActionId(7) })
        );
    }

    #[test]
    fn zero_interval_fails_validation() {
        let periodic = PeriodicConfig {
            per_tick: BaseDamage::Fixed(10.0),
            ticks: TickFormula::Fixed(3),
            interval_ms: 0,
            refresh: RefreshPolicy::Replace,
            tag: None,
            can_crit: false,
        };
        assert_eq!(
            EffectKind::PeriodicDamage(periodic).validate(ActionId(2)),
            Err(ConfigError::ZeroTickInterval { spell: ActionId(2) })
        );
    }

    #[test]
    fn referenced_spells_walks_composites() {
        let effect = EffectKind::Composite(vec![
            EffectKind::CastOnTargets {
                spell: ActionId(10),
                scope: TargetScope::AllEnemies,
            },
            EffectKind::ResourceGenerator {
                kind: ResourceKind::Energy,
                amount: 20.0,
            },
        ]);
        assert_eq!(effect.referenced_spells(), vec![ActionId(10)]);
    }
}
