//! Content factory for loading every definition from a data directory.

use std::path::{Path, PathBuf};

use sim_core::{Loadout, SimConfig, Spellbook};

use crate::ClassPreset;
use crate::loaders::{
    ConfigLoader, LoadResult, LoadoutLoader, ScenarioDef, ScenarioLoader, SpellDef, SpellLoader,
};

/// Content factory that loads all simulation content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells/
/// │   ├── rogue.ron
/// │   └── warlock.ron
/// ├── loadouts/
/// │   ├── rogue.toml
/// │   └── warlock.toml
/// └── scenarios/
///     ├── rogue_tempest.toml
///     └── warlock_fire.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load a loadout from `loadouts/{name}.toml`.
    pub fn load_loadout(&self, name: &str) -> LoadResult<Loadout> {
        let path = self.data_dir.join("loadouts").join(format!("{}.toml", name));
        LoadoutLoader::load(&path)
    }

    /// Load a class's spell definitions from `spells/{class}.ron`.
    ///
    /// Falls back to the embedded preset when the file does not exist.
    pub fn load_spell_defs(&self, class: &str) -> LoadResult<Vec<SpellDef>> {
        let path = self.data_dir.join("spells").join(format!("{}.ron", class));
        if path.exists() {
            return SpellLoader::load(&path);
        }
        let preset: ClassPreset = class
            .parse()
            .map_err(|_| anyhow::anyhow!("No spells for class {} in {}", class, path.display()))?;
        tracing::debug!("Using embedded spells for {}", preset);
        SpellLoader::parse(preset.spells_ron())
    }

    /// Build a validated spellbook for `class` against `loadout`.
    pub fn load_spellbook(
        &self,
        class: &str,
        loadout: &Loadout,
        config: &SimConfig,
    ) -> LoadResult<Spellbook> {
        let defs = self.load_spell_defs(class)?;
        SpellLoader::build_spellbook(&defs, loadout, config)
    }

    /// Load a scenario from `scenarios/{name}.toml`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioDef> {
        let path = self.data_dir.join("scenarios").join(format!("{}.toml", name));
        ScenarioLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_spell_file_falls_back_to_preset() {
        let factory = ContentFactory::new("/nonexistent");
        let defs = factory.load_spell_defs("warlock").unwrap();
        assert!(defs.iter().any(|def| def.id == 47838));
        assert!(factory.load_spell_defs("paladin").is_err());
    }
}
