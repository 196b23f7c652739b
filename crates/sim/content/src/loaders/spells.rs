//! Spell definition loader.
//!
//! A RON file holds a list of [`SpellDef`]. Definitions are plain data; every
//! talent, set or rune dependent number is written as a modifier spec and
//! resolved once against the caster's loadout when the spellbook is built.
//!
//! ```ron
//! [
//!     (
//!         id: 1752,
//!         name: "Sinister Strike",
//!         roll: MeleeSpecialHitAndCrit,
//!         defense: Melee,
//!         cost: Some((kind: Energy, flat: 45.0, refund_on_miss: 0.8)),
//!         effect: DirectDamage(Scaled(stat: AttackPower, coefficient: 0.5)),
//!         side_effects: [GainPoints(1)],
//!     ),
//! ]
//! ```

use std::path::Path;

use serde::Deserialize;
use sim_core::{
    ActionId, BaseDamage, BonusSpec, ConfigError, DefenseType, DotTag, EffectKind, Loadout,
    ModifierSpec, MultiplierStack, PeriodicConfig, PointTable, ProcMask, RefreshPolicy,
    ResourceKind, RollCategory, ScalingStat, SideEffect, SimConfig, SpellBuilder, SpellConfig,
    SpellFlags, SpellSchool, Spellbook, TargetScope, TickFormula,
};

use crate::loaders::{LoadResult, read_file};

fn default_roll() -> RollCategory {
    RollCategory::AlwaysHit
}

fn default_gcd_ms() -> u64 {
    SimConfig::DEFAULT_GCD_MS
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_cost_kind() -> ResourceKind {
    ResourceKind::Mana
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpellDef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub school: SpellSchool,
    #[serde(default)]
    pub defense: DefenseType,
    #[serde(default = "default_roll")]
    pub roll: RollCategory,
    #[serde(default)]
    pub proc_mask: ProcMask,
    #[serde(default)]
    pub flags: SpellFlags,
    #[serde(default)]
    pub cost: Option<CostDef>,
    #[serde(default)]
    pub cast_time_ms: u64,
    #[serde(default = "default_gcd_ms")]
    pub gcd_ms: u64,
    #[serde(default)]
    pub ignore_haste: bool,
    #[serde(default)]
    pub damage_modifiers: Vec<ModifierSpec>,
    #[serde(default)]
    pub threat_modifiers: Vec<ModifierSpec>,
    #[serde(default)]
    pub bonus_crit: Vec<BonusSpec>,
    #[serde(default)]
    pub crit_damage: Vec<BonusSpec>,
    pub effect: EffectDef,
    #[serde(default)]
    pub side_effects: Vec<SideEffect>,
    /// The spell only exists for loadouts with this rune engraved.
    #[serde(default)]
    pub requires_rune: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CostDef {
    #[serde(default = "default_cost_kind")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub flat: f64,
    #[serde(default)]
    pub base_mana_fraction: f64,
    #[serde(default)]
    pub modifiers: Vec<ModifierSpec>,
    #[serde(default)]
    pub refund_on_miss: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub enum BaseDamageDef {
    Fixed(f64),
    Scaled {
        stat: ScalingStat,
        coefficient: f64,
    },
    Range {
        min: f64,
        max: f64,
        stat: ScalingStat,
        coefficient: f64,
        /// Factors applied to `coefficient`, e.g. Shadow and Flame.
        #[serde(default)]
        coefficient_modifiers: Vec<ModifierSpec>,
    },
    PerPoint {
        table: Vec<f64>,
        stat: ScalingStat,
    },
    WhileDotActive {
        base: Box<BaseDamageDef>,
        dot: u32,
        #[serde(default)]
        flat_bonus: f64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
        #[serde(default)]
        multiplier_modifiers: Vec<ModifierSpec>,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct PeriodicDef {
    pub per_tick: BaseDamageDef,
    pub ticks: TickFormula,
    pub interval_ms: u64,
    #[serde(default)]
    pub refresh: RefreshPolicy,
    #[serde(default)]
    pub tag: Option<DotTag>,
    #[serde(default)]
    pub can_crit: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub enum EffectDef {
    DirectDamage(BaseDamageDef),
    PeriodicDamage(PeriodicDef),
    ResourceGenerator { kind: ResourceKind, amount: f64 },
    CastOnTargets { spell: u32, scope: TargetScope },
    Composite(Vec<EffectDef>),
}

impl BaseDamageDef {
    pub fn resolve(&self, loadout: &Loadout) -> Result<BaseDamage, ConfigError> {
        Ok(match self {
            Self::Fixed(amount) => BaseDamage::Fixed(*amount),
            Self::Scaled { stat, coefficient } => BaseDamage::Scaled {
                stat: *stat,
                coefficient: *coefficient,
            },
            Self::Range {
                min,
                max,
                stat,
                coefficient,
                coefficient_modifiers,
            } => BaseDamage::Range {
                min: *min,
                max: *max,
                stat: *stat,
                coefficient: coefficient
                    * MultiplierStack::resolve(coefficient_modifiers, loadout)?.product(),
            },
            Self::PerPoint { table, stat } => BaseDamage::PerPoint {
                table: PointTable::new(table)?,
                stat: *stat,
            },
            Self::WhileDotActive {
                base,
                dot,
                flat_bonus,
                multiplier,
                multiplier_modifiers,
            } => BaseDamage::WhileDotActive {
                base: Box::new(base.resolve(loadout)?),
                dot: ActionId(*dot),
                flat_bonus: *flat_bonus,
                multiplier: multiplier
                    * MultiplierStack::resolve(multiplier_modifiers, loadout)?.product(),
            },
        })
    }
}

impl EffectDef {
    pub fn resolve(&self, loadout: &Loadout) -> Result<EffectKind, ConfigError> {
        Ok(match self {
            Self::DirectDamage(base) => EffectKind::DirectDamage {
                base: base.resolve(loadout)?,
            },
            Self::PeriodicDamage(periodic) => EffectKind::PeriodicDamage(PeriodicConfig {
                per_tick: periodic.per_tick.resolve(loadout)?,
                ticks: periodic.ticks,
                interval_ms: periodic.interval_ms,
                refresh: periodic.refresh,
                tag: periodic.tag,
                can_crit: periodic.can_crit,
            }),
            Self::ResourceGenerator { kind, amount } => EffectKind::ResourceGenerator {
                kind: *kind,
                amount: *amount,
            },
            Self::CastOnTargets { spell, scope } => EffectKind::CastOnTargets {
                spell: ActionId(*spell),
                scope: *scope,
            },
            Self::Composite(children) => EffectKind::Composite(
                children
                    .iter()
                    .map(|child| child.resolve(loadout))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl SpellDef {
    pub fn action_id(&self) -> ActionId {
        ActionId(self.id)
    }

    pub fn is_available(&self, loadout: &Loadout) -> bool {
        self.requires_rune
            .as_deref()
            .is_none_or(|rune| loadout.has_rune(rune))
    }

    /// Translates the definition into a builder with every field set.
    pub fn builder(&self, loadout: &Loadout) -> Result<SpellBuilder, ConfigError> {
        let mut builder = SpellConfig::builder(self.action_id(), self.name.clone())
            .school(self.school)
            .defense(self.defense)
            .roll(self.roll)
            .proc_mask(self.proc_mask)
            .flags(self.flags)
            .cast_time_ms(self.cast_time_ms)
            .gcd_ms(self.gcd_ms)
            .effect(self.effect.resolve(loadout)?);

        if self.ignore_haste {
            builder = builder.ignore_haste();
        }
        if let Some(cost) = &self.cost {
            if cost.base_mana_fraction > 0.0 {
                builder = builder.cost_base_mana_fraction(cost.base_mana_fraction);
            }
            builder = builder
                .cost(cost.kind, cost.flat)
                .refund_on_miss(cost.refund_on_miss);
            for modifier in &cost.modifiers {
                builder = builder.cost_modifier(modifier.clone());
            }
        }
        for modifier in &self.damage_modifiers {
            builder = builder.damage_modifier(modifier.clone());
        }
        for modifier in &self.threat_modifiers {
            builder = builder.threat_modifier(modifier.clone());
        }
        for bonus in &self.bonus_crit {
            builder = builder.bonus_crit(bonus.clone());
        }
        for bonus in &self.crit_damage {
            builder = builder.crit_damage(bonus.clone());
        }
        for side_effect in &self.side_effects {
            builder = builder.side_effect(side_effect.clone());
        }
        Ok(builder)
    }

    pub fn build(&self, loadout: &Loadout, config: &SimConfig) -> Result<SpellConfig, ConfigError> {
        self.builder(loadout)?.build(loadout, config)
    }
}

/// Loader for spell definitions from RON files.
pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load spells {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SpellDef>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse spell RON: {}", e))
    }

    /// Builds every definition available to `loadout` into a validated book.
    ///
    /// Rune-gated definitions are skipped when the rune is missing. Any
    /// invalid definition or dangling wrapper reference fails the whole book.
    pub fn build_spellbook(
        defs: &[SpellDef],
        loadout: &Loadout,
        config: &SimConfig,
    ) -> LoadResult<Spellbook> {
        let mut book = Spellbook::new();
        for def in defs {
            if !def.is_available(loadout) {
                tracing::debug!(
                    "Skipping {} ({}): rune {:?} not engraved",
                    def.name,
                    def.id,
                    def.requires_rune
                );
                continue;
            }
            let spell = def
                .build(loadout, config)
                .map_err(|e| anyhow::anyhow!("Invalid spell {} ({}): {}", def.name, def.id, e))?;
            book.register(spell)
                .map_err(|e| anyhow::anyhow!("Cannot register {}: {}", def.name, e))?;
        }
        book.validate()
            .map_err(|e| anyhow::anyhow!("Spellbook is inconsistent: {}", e))?;
        Ok(book)
    }
}
