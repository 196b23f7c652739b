use std::collections::BTreeMap;

use sim_core::{DefenseType, DotTag, MitigationOracle, MitigationQuery, SpellSchool, UnitId};

/// Armor and school based damage reduction.
///
/// Physical melee and ranged hits are reduced by the target's armor:
/// `armor / (armor + constant)`, capped at 75%. Bleeds ignore armor. Other
/// schools take a per-school multiplier from debuffs on the target.
#[derive(Clone, Debug)]
pub struct ArmorMitigation {
    /// Armor constant for the attacker's level.
    armor_constant: f64,
    armor: BTreeMap<UnitId, f64>,
    school_taken: BTreeMap<(UnitId, SpellSchool), f64>,
}

impl ArmorMitigation {
    /// Constant for a level 60 attacker: `400 + 85 * 60 = 5500`.
    pub const LEVEL_60_CONSTANT: f64 = 5_500.0;
    pub const MAX_REDUCTION: f64 = 0.75;

    pub fn new() -> Self {
        Self::with_constant(Self::LEVEL_60_CONSTANT)
    }

    pub fn with_constant(armor_constant: f64) -> Self {
        Self {
            armor_constant,
            armor: BTreeMap::new(),
            school_taken: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_armor(mut self, unit: UnitId, armor: f64) -> Self {
        self.armor.insert(unit, armor.max(0.0));
        self
    }

    /// Damage taken factor for one school, e.g. `1.1` for a curse.
    #[must_use]
    pub fn with_school_taken(mut self, unit: UnitId, school: SpellSchool, factor: f64) -> Self {
        self.school_taken.insert((unit, school), factor);
        self
    }

    pub fn armor_reduction(&self, unit: UnitId) -> f64 {
        let armor = self.armor.get(&unit).copied().unwrap_or(0.0);
        if armor <= 0.0 {
            return 0.0;
        }
        (armor / (armor + self.armor_constant)).min(Self::MAX_REDUCTION)
    }

    fn ignores_armor(query: &MitigationQuery) -> bool {
        query.tag == Some(DotTag::Bleed)
            || !matches!(query.defense, DefenseType::Melee | DefenseType::Ranged)
            || !query.school.is_physical()
    }
}

impl Default for ArmorMitigation {
    fn default() -> Self {
        Self::new()
    }
}

impl MitigationOracle for ArmorMitigation {
    fn damage_taken(&self, query: &MitigationQuery) -> f64 {
        let armor = if Self::ignores_armor(query) {
            1.0
        } else {
            1.0 - self.armor_reduction(query.target)
        };
        let school = self
            .school_taken
            .get(&(query.target, query.school))
            .copied()
            .unwrap_or(1.0);
        armor * school
    }
}
