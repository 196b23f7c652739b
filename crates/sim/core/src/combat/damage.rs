//! Damage classification shared by spells, ticks and mitigation queries.

/// Damage school of a spell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpellSchool {
    #[default]
    Physical,
    Arcane,
    Fire,
    Frost,
    Holy,
    Nature,
    Shadow,
}

impl SpellSchool {
    pub const fn is_physical(self) -> bool {
        matches!(self, Self::Physical)
    }
}

/// How the defender gets to mitigate a hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DefenseType {
    /// No mitigation step applies.
    #[default]
    None,
    Magic,
    Melee,
    Ranged,
}

/// Crit damage multiplier: `1 + base_bonus * (1 + secondary)`.
///
/// `base_bonus` is the school default from [`crate::SimConfig`]; `secondary`
/// stacks talents that increase crit damage (a 5/5 talent granting +100%
/// of the bonus passes `1.0`).
pub fn crit_multiplier(base_bonus: f64, secondary: f64) -> f64 {
    1.0 + base_bonus * (1.0 + secondary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crit_multiplier_scales_bonus() {
        assert_eq!(crit_multiplier(0.5, 0.0), 1.5);
        assert_eq!(crit_multiplier(0.5, 1.0), 2.0);
        assert_eq!(crit_multiplier(1.0, 0.0), 2.0);
    }

    #[test]
    fn school_parses_case_insensitive() {
        assert_eq!("Fire".parse::<SpellSchool>().unwrap(), SpellSchool::Fire);
        assert!(SpellSchool::Physical.is_physical());
    }
}
