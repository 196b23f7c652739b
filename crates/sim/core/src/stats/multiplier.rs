//! Multiplier pipeline.
//!
//! Talents, set bonuses, runes and situational flags arrive as a [`Loadout`]:
//! plain numbers and names fixed for the whole simulation. Spell construction
//! resolves each [`ModifierSpec`] against the loadout into a factor and keeps
//! the result in a [`MultiplierStack`].
//!
//! The pipeline is `base * Π(factor_i)`. Factors are independent of each other,
//! so order does not matter. A modifier whose input has no effect (rank zero,
//! flag absent, set incomplete) contributes exactly `1.0`; it is never skipped
//! and never zero.

use std::collections::{BTreeMap, BTreeSet};

use crate::spell::ConfigError;

// ============================================================================
// Loadout
// ============================================================================

/// Talent ranks, set pieces, runes and flags for one character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    pub talents: BTreeMap<String, u8>,
    pub set_pieces: BTreeMap<String, u8>,
    pub runes: BTreeSet<String>,
    pub flags: BTreeSet<String>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_talent(mut self, talent: impl Into<String>, rank: u8) -> Self {
        self.talents.insert(talent.into(), rank);
        self
    }

    #[must_use]
    pub fn with_set_pieces(mut self, set: impl Into<String>, pieces: u8) -> Self {
        self.set_pieces.insert(set.into(), pieces);
        self
    }

    #[must_use]
    pub fn with_rune(mut self, rune: impl Into<String>) -> Self {
        self.runes.insert(rune.into());
        self
    }

    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Rank of `talent`; untaken talents are rank zero.
    pub fn talent_rank(&self, talent: &str) -> u8 {
        self.talents.get(talent).copied().unwrap_or(0)
    }

    pub fn set_pieces(&self, set: &str) -> u8 {
        self.set_pieces.get(set).copied().unwrap_or(0)
    }

    pub fn has_rune(&self, rune: &str) -> bool {
        self.runes.contains(rune)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

// ============================================================================
// Multiplicative modifiers
// ============================================================================

/// One multiplicative modifier source, resolved against a [`Loadout`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierSpec {
    /// Always-on factor.
    Constant(f64),
    /// Factor looked up by talent rank. Index 0 is the untaken rank.
    RankTable { talent: String, table: Vec<f64> },
    /// `1 + per_rank * rank`.
    PerRank { talent: String, per_rank: f64 },
    /// `factor` once the loadout wears at least `pieces` items of `set`.
    SetBonus { set: String, pieces: u8, factor: f64 },
    /// `factor` while the situational flag is set.
    Flag { flag: String, factor: f64 },
    /// `factor` while the rune is engraved.
    Rune { rune: String, factor: f64 },
}

impl ModifierSpec {
    pub fn label(&self) -> String {
        match self {
            Self::Constant(_) => "constant".to_string(),
            Self::RankTable { talent, .. } | Self::PerRank { talent, .. } => talent.clone(),
            Self::SetBonus { set, pieces, .. } => format!("{set} ({pieces}pc)"),
            Self::Flag { flag, .. } => flag.clone(),
            Self::Rune { rune, .. } => rune.clone(),
        }
    }

    /// Resolves this modifier into a single factor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RankOutOfRange` when the loadout's rank has no
    /// table entry, and `ConfigError::InvalidFactor` for negative or
    /// non-finite results.
    pub fn resolve(&self, loadout: &Loadout) -> Result<f64, ConfigError> {
        let factor = match self {
            Self::Constant(factor) => *factor,
            Self::RankTable { talent, table } => {
                let rank = loadout.talent_rank(talent);
                *table
                    .get(usize::from(rank))
                    .ok_or_else(|| ConfigError::RankOutOfRange {
                        talent: talent.clone(),
                        rank,
                        entries: table.len(),
                    })?
            }
            Self::PerRank { talent, per_rank } => {
                1.0 + per_rank * f64::from(loadout.talent_rank(talent))
            }
            Self::SetBonus {
                set,
                pieces,
                factor,
            } => {
                if loadout.set_pieces(set) >= *pieces {
                    *factor
                } else {
                    1.0
                }
            }
            Self::Flag { flag, factor } => {
                if loadout.has_flag(flag) {
                    *factor
                } else {
                    1.0
                }
            }
            Self::Rune { rune, factor } => {
                if loadout.has_rune(rune) {
                    *factor
                } else {
                    1.0
                }
            }
        };

        if !factor.is_finite() || factor < 0.0 {
            return Err(ConfigError::InvalidFactor {
                modifier: self.label(),
                factor,
            });
        }
        Ok(factor)
    }
}

/// Resolved factors, one per configured modifier.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplierStack {
    entries: Vec<(String, f64)>,
}

impl MultiplierStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every spec against `loadout`, failing on the first invalid one.
    pub fn resolve(specs: &[ModifierSpec], loadout: &Loadout) -> Result<Self, ConfigError> {
        let entries = specs
            .iter()
            .map(|spec| Ok((spec.label(), spec.resolve(loadout)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn with_factor(mut self, label: impl Into<String>, factor: f64) -> Self {
        self.entries.push((label.into(), factor));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(label, factor)| (label.as_str(), *factor))
    }

    /// Product of all factors; an empty stack is `1.0`.
    pub fn product(&self) -> f64 {
        self.entries.iter().map(|(_, factor)| factor).product()
    }

    pub fn apply(&self, base: f64) -> f64 {
        base * self.product()
    }
}

// ============================================================================
// Additive bonuses
// ============================================================================

/// Additive bonus source (crit chance, crit damage). "No effect" is `0.0`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusSpec {
    Constant(f64),
    PerRank { talent: String, per_rank: f64 },
    /// `value` once the talent has at least one rank.
    Talent { talent: String, value: f64 },
    SetBonus { set: String, pieces: u8, value: f64 },
    Flag { flag: String, value: f64 },
}

impl BonusSpec {
    pub fn resolve(&self, loadout: &Loadout) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::PerRank { talent, per_rank } => {
                per_rank * f64::from(loadout.talent_rank(talent))
            }
            Self::Talent { talent, value } if loadout.talent_rank(talent) > 0 => *value,
            Self::SetBonus { set, pieces, value } if loadout.set_pieces(set) >= *pieces => *value,
            Self::Flag { flag, value } if loadout.has_flag(flag) => *value,
            Self::Talent { .. } | Self::SetBonus { .. } | Self::Flag { .. } => 0.0,
        }
    }

    pub fn sum(specs: &[BonusSpec], loadout: &Loadout) -> f64 {
        specs.iter().map(|spec| spec.resolve(loadout)).sum()
    }
}
