//! Validated spell configuration and its builder.

use bitflags::bitflags;

use crate::combat::{DefenseType, RollCategory, SpellSchool, crit_multiplier};
use crate::config::SimConfig;
use crate::spell::{ConfigError, EffectKind, SideEffect};
use crate::state::ActionId;
use crate::stats::{AttackerStats, BonusSpec, Loadout, ModifierSpec, MultiplierStack, ResourceKind};

bitflags! {
    /// Classifies a hit for secondary-trigger rules.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProcMask: u32 {
        const MELEE_MH_AUTO    = 1 << 0;
        const MELEE_MH_SPECIAL = 1 << 1;
        const MELEE_OH_SPECIAL = 1 << 2;
        const RANGED_SPECIAL   = 1 << 3;
        const SPELL_DAMAGE     = 1 << 4;
        const PERIODIC_DAMAGE  = 1 << 5;
    }
}

bitflags! {
    /// Behavioural switches on a spell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpellFlags: u32 {
        /// Damage is reported under melee metrics.
        const MELEE_METRICS    = 1 << 0;
        /// Reads combo points at cast start and spends them once the cast lands.
        const FINISHER         = 1 << 1;
        const NO_ON_CAST_PROCS = 1 << 2;
    }
}

/// Resolved resource cost of a spell.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceCost {
    pub kind: ResourceKind,
    /// Flat amount before reductions.
    pub flat: f64,
    /// Fraction of the caster's base mana added to `flat`.
    pub base_mana_fraction: f64,
    /// Product of every cost modifier.
    pub multiplier: f64,
    /// Fraction of the paid cost returned when the cast does not land.
    pub refund_on_miss: f64,
}

impl ResourceCost {
    pub fn amount(&self, stats: &AttackerStats) -> f64 {
        (self.flat + self.base_mana_fraction * stats.base_mana) * self.multiplier
    }
}

/// Cast time and global cooldown, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastTiming {
    pub cast_time_ms: u64,
    /// Zero means the spell neither checks nor triggers the global cooldown.
    pub gcd_ms: u64,
    pub ignore_haste: bool,
}

impl CastTiming {
    pub fn cast_time(&self, stats: &AttackerStats) -> u64 {
        if self.ignore_haste {
            self.cast_time_ms
        } else {
            stats.hasted_ms(self.cast_time_ms)
        }
    }

    /// Hasted global cooldown, floored at the configured minimum.
    pub fn gcd(&self, stats: &AttackerStats, config: &SimConfig) -> u64 {
        if self.gcd_ms == 0 || self.ignore_haste {
            return self.gcd_ms;
        }
        stats
            .hasted_ms(self.gcd_ms)
            .max(config.min_gcd_ms.min(self.gcd_ms))
    }
}

impl Default for CastTiming {
    fn default() -> Self {
        Self {
            cast_time_ms: 0,
            gcd_ms: SimConfig::DEFAULT_GCD_MS,
            ignore_haste: false,
        }
    }
}

/// Immutable spell configuration, built once per caster and reused for every cast.
#[derive(Clone, Debug, PartialEq)]
pub struct SpellConfig {
    pub id: ActionId,
    pub name: String,
    pub school: SpellSchool,
    pub defense: DefenseType,
    pub roll: RollCategory,
    pub proc_mask: ProcMask,
    pub flags: SpellFlags,
    pub cost: Option<ResourceCost>,
    pub timing: CastTiming,
    pub damage: MultiplierStack,
    pub threat: MultiplierStack,
    /// Crit chance added on top of the caster's.
    pub bonus_crit: f64,
    pub crit_multiplier: f64,
    pub effect: EffectKind,
    pub side_effects: Vec<SideEffect>,
}

impl SpellConfig {
    pub fn builder(id: ActionId, name: impl Into<String>) -> SpellBuilder {
        SpellBuilder::new(id, name)
    }

    pub fn is_finisher(&self) -> bool {
        self.flags.contains(SpellFlags::FINISHER)
    }

    pub fn triggers_gcd(&self) -> bool {
        self.timing.gcd_ms > 0
    }

    pub fn damage_multiplier(&self) -> f64 {
        self.damage.product()
    }

    pub fn threat_multiplier(&self) -> f64 {
        self.threat.product()
    }
}

#[derive(Clone, Debug)]
struct CostSpec {
    kind: ResourceKind,
    flat: f64,
    base_mana_fraction: f64,
    refund_on_miss: f64,
    modifiers: Vec<ModifierSpec>,
}

/// Builder for [`SpellConfig`]; validation happens once, in [`SpellBuilder::build`].
#[derive(Clone, Debug)]
pub struct SpellBuilder {
    id: ActionId,
    name: String,
    school: SpellSchool,
    defense: DefenseType,
    roll: RollCategory,
    proc_mask: ProcMask,
    flags: SpellFlags,
    cost: Option<CostSpec>,
    timing: CastTiming,
    damage: Vec<ModifierSpec>,
    threat: Vec<ModifierSpec>,
    bonus_crit: Vec<BonusSpec>,
    crit_damage: Vec<BonusSpec>,
    effect: Option<EffectKind>,
    side_effects: Vec<SideEffect>,
}

impl SpellBuilder {
    pub fn new(id: ActionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            school: SpellSchool::Physical,
            defense: DefenseType::None,
            roll: RollCategory::AlwaysHit,
            proc_mask: ProcMask::empty(),
            flags: SpellFlags::empty(),
            cost: None,
            timing: CastTiming::default(),
            damage: Vec::new(),
            threat: Vec::new(),
            bonus_crit: Vec::new(),
            crit_damage: Vec::new(),
            effect: None,
            side_effects: Vec::new(),
        }
    }

    pub fn school(mut self, school: SpellSchool) -> Self {
        self.school = school;
        self
    }

    pub fn defense(mut self, defense: DefenseType) -> Self {
        self.defense = defense;
        self
    }

    pub fn roll(mut self, roll: RollCategory) -> Self {
        self.roll = roll;
        self
    }

    pub fn proc_mask(mut self, proc_mask: ProcMask) -> Self {
        self.proc_mask = proc_mask;
        self
    }

    pub fn flags(mut self, flags: SpellFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn cost(mut self, kind: ResourceKind, flat: f64) -> Self {
        let spec = self.cost_spec();
        spec.kind = kind;
        spec.flat = flat;
        self
    }

    /// Mana cost expressed as a fraction of the caster's base mana.
    pub fn cost_base_mana_fraction(mut self, fraction: f64) -> Self {
        let spec = self.cost_spec();
        spec.kind = ResourceKind::Mana;
        spec.base_mana_fraction = fraction;
        self
    }

    pub fn cost_modifier(mut self, modifier: ModifierSpec) -> Self {
        self.cost_spec().modifiers.push(modifier);
        self
    }

    pub fn refund_on_miss(mut self, fraction: f64) -> Self {
        self.cost_spec().refund_on_miss = fraction;
        self
    }

    fn cost_spec(&mut self) -> &mut CostSpec {
        self.cost.get_or_insert_with(|| CostSpec {
            kind: ResourceKind::Mana,
            flat: 0.0,
            base_mana_fraction: 0.0,
            refund_on_miss: 0.0,
            modifiers: Vec::new(),
        })
    }

    pub fn cast_time_ms(mut self, cast_time_ms: u64) -> Self {
        self.timing.cast_time_ms = cast_time_ms;
        self
    }

    pub fn gcd_ms(mut self, gcd_ms: u64) -> Self {
        self.timing.gcd_ms = gcd_ms;
        self
    }

    pub fn ignore_haste(mut self) -> Self {
        self.timing.ignore_haste = true;
        self
    }

    pub fn damage_modifier(mut self, modifier: ModifierSpec) -> Self {
        self.damage.push(modifier);
        self
    }

    pub fn threat_modifier(mut self, modifier: ModifierSpec) -> Self {
        self.threat.push(modifier);
        self
    }

    pub fn bonus_crit(mut self, bonus: BonusSpec) -> Self {
        self.bonus_crit.push(bonus);
        self
    }

    /// Adds to the secondary crit damage bonus, e.g. `Ruin` at `rank / 5`.
    pub fn crit_damage(mut self, bonus: BonusSpec) -> Self {
        self.crit_damage.push(bonus);
        self
    }

    pub fn effect(mut self, effect: EffectKind) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn side_effect(mut self, side_effect: SideEffect) -> Self {
        self.side_effects.push(side_effect);
        self
    }

    /// Resolves every modifier against `loadout` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a missing effect, an invalid cost, a
    /// modifier that cannot be resolved, or an invalid nested effect.
    pub fn build(self, loadout: &Loadout, config: &SimConfig) -> Result<SpellConfig, ConfigError> {
        let effect = self.effect.ok_or(ConfigError::MissingEffect(self.id))?;
        effect.validate(self.id)?;

        let cost = match self.cost {
            Some(spec) => {
                let multiplier = MultiplierStack::resolve(&spec.modifiers, loadout)?.product();
                let cost = ResourceCost {
                    kind: spec.kind,
                    flat: spec.flat,
                    base_mana_fraction: spec.base_mana_fraction,
                    multiplier,
                    refund_on_miss: spec.refund_on_miss,
                };
                for amount in [cost.flat, cost.base_mana_fraction, cost.refund_on_miss] {
                    if !amount.is_finite() || amount < 0.0 {
                        return Err(ConfigError::InvalidCost {
                            spell: self.id,
                            amount,
                        });
                    }
                }
                Some(cost)
            }
            None => None,
        };

        let base_crit_bonus = match self.defense {
            DefenseType::Melee | DefenseType::Ranged => config.melee_crit_bonus,
            DefenseType::Magic | DefenseType::None => config.spell_crit_bonus,
        };

        Ok(SpellConfig {
            id: self.id,
            name: self.name,
            school: self.school,
            defense: self.defense,
            roll: self.roll,
            proc_mask: self.proc_mask,
            flags: self.flags,
            cost,
            timing: self.timing,
            damage: MultiplierStack::resolve(&self.damage, loadout)?,
            threat: MultiplierStack::resolve(&self.threat, loadout)?,
            bonus_crit: BonusSpec::sum(&self.bonus_crit, loadout),
            crit_multiplier: crit_multiplier(
                base_crit_bonus,
                BonusSpec::sum(&self.crit_damage, loadout),
            ),
            effect,
            side_effects: self.side_effects,
        })
    }
}
