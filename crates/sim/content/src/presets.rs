//! Spell lists compiled into the binary.

use strum::{Display, EnumIter, EnumString};

/// Classes whose spell lists ship with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClassPreset {
    Rogue,
    Warlock,
}

impl ClassPreset {
    /// RON source of the class's spell definitions.
    pub fn spells_ron(self) -> &'static str {
        match self {
            Self::Rogue => include_str!("../data/spells/rogue.ron"),
            Self::Warlock => include_str!("../data/spells/warlock.ron"),
        }
    }

    /// TOML source of the class's reference loadout.
    pub fn loadout_toml(self) -> &'static str {
        match self {
            Self::Rogue => include_str!("../data/loadouts/rogue.toml"),
            Self::Warlock => include_str!("../data/loadouts/warlock.toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Rogue".parse::<ClassPreset>().unwrap(), ClassPreset::Rogue);
        assert_eq!("warlock".parse::<ClassPreset>().unwrap(), ClassPreset::Warlock);
        assert!("paladin".parse::<ClassPreset>().is_err());
    }

    #[test]
    fn every_preset_ships_data() {
        for preset in ClassPreset::iter() {
            assert!(!preset.spells_ron().trim().is_empty(), "{preset}");
            assert!(!preset.loadout_toml().trim().is_empty(), "{preset}");
        }
    }
}
