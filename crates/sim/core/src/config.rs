/// Simulation constants and tunable parameters.
///
/// One `SimConfig` is passed into every [`crate::CombatEngine`]; nothing in the
/// core reads process-wide settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seed mixed into every outcome and variance roll.
    pub seed: u64,
    /// Floor applied to hasted global cooldowns, in milliseconds.
    pub min_gcd_ms: u64,
    /// Extra damage fraction dealt by a physical critical strike.
    pub melee_crit_bonus: f64,
    /// Extra damage fraction dealt by a magical critical strike.
    pub spell_crit_bonus: f64,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    /// Highest combo point count a discrete pool can hold.
    pub const MAX_COMBO_POINTS: u8 = 5;
    /// Number of entries every point table carries (zero through max).
    pub const POINT_TABLE_LEN: usize = Self::MAX_COMBO_POINTS as usize + 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0;
    pub const DEFAULT_GCD_MS: u64 = 1_500;
    pub const DEFAULT_MIN_GCD_MS: u64 = 1_000;
    pub const DEFAULT_MELEE_CRIT_BONUS: f64 = 1.0;
    pub const DEFAULT_SPELL_CRIT_BONUS: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            min_gcd_ms: Self::DEFAULT_MIN_GCD_MS,
            melee_crit_bonus: Self::DEFAULT_MELEE_CRIT_BONUS,
            spell_crit_bonus: Self::DEFAULT_SPELL_CRIT_BONUS,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
