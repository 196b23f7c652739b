//! Loaders that turn RON/TOML files into `sim-core` values.

pub mod config;
pub mod factory;
pub mod loadout;
pub mod scenario;
pub mod spells;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use loadout::LoadoutLoader;
pub use scenario::{CasterDef, PoolDef, RegenDef, RotationStep, ScenarioDef, ScenarioLoader, TargetDef};
pub use spells::{BaseDamageDef, CostDef, EffectDef, PeriodicDef, SpellDef, SpellLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
