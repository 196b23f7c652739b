//! Read-only stat snapshots handed to the core by the stats oracle.
//!
//! All chances are fractions in `[0, 1]`; `0.05` means five percent.

/// Offensive stats of a caster at the moment a roll or snapshot happens.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackerStats {
    pub attack_power: f64,
    pub spell_power: f64,
    pub melee_hit: f64,
    pub spell_hit: f64,
    pub melee_crit: f64,
    pub spell_crit: f64,
    /// Reduction applied to the defender's dodge and parry chances.
    pub expertise: f64,
    /// Haste factor; `1.25` shortens cast times and cooldowns by 20%.
    pub cast_speed: f64,
    /// Caster-wide damage factor from buffs outside any spell configuration.
    pub damage_multiplier: f64,
    /// Base mana, used by costs expressed as a fraction of it.
    pub base_mana: f64,
}

impl AttackerStats {
    pub fn with_attack_power(attack_power: f64) -> Self {
        Self {
            attack_power,
            ..Self::default()
        }
    }

    pub fn with_spell_power(spell_power: f64) -> Self {
        Self {
            spell_power,
            ..Self::default()
        }
    }

    /// Scales a duration by haste. Non-positive cast speed counts as unhasted.
    pub fn hasted_ms(&self, duration_ms: u64) -> u64 {
        if self.cast_speed <= 0.0 {
            return duration_ms;
        }
        (duration_ms as f64 / self.cast_speed).round() as u64
    }
}

impl Default for AttackerStats {
    fn default() -> Self {
        Self {
            attack_power: 0.0,
            spell_power: 0.0,
            melee_hit: 0.0,
            spell_hit: 0.0,
            melee_crit: 0.0,
            spell_crit: 0.0,
            expertise: 0.0,
            cast_speed: 1.0,
            damage_multiplier: 1.0,
            base_mana: 0.0,
        }
    }
}

/// Avoidance stats of the unit being attacked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefenderStats {
    pub melee_miss: f64,
    pub spell_miss: f64,
    pub dodge: f64,
    pub parry: f64,
    /// Units attacked from behind, or that cannot parry at all, set this false.
    pub can_parry: bool,
    /// Flat reduction applied to the attacker's crit chance.
    pub crit_suppression: f64,
}

impl DefenderStats {
    /// Typical raid boss avoidance against a level-capped attacker from behind.
    pub fn boss() -> Self {
        Self {
            melee_miss: 0.08,
            spell_miss: 0.17,
            dodge: 0.065,
            parry: 0.14,
            can_parry: false,
            crit_suppression: 0.048,
        }
    }
}
