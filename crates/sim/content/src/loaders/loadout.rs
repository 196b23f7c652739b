//! Loadout loader (talents, set pieces, runes, flags).

use std::path::Path;

use sim_core::Loadout;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`Loadout`] from TOML files.
///
/// ```toml
/// runes = ["crimson_tempest"]
///
/// [talents]
/// serrated_blades = 3
///
/// [set_pieces]
/// malefic_raiment = 4
/// ```
pub struct LoadoutLoader;

impl LoadoutLoader {
    pub fn load(path: &Path) -> LoadResult<Loadout> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load loadout {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Loadout> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse loadout TOML: {}", e))
    }
}
