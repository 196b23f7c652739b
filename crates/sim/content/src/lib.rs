//! Data-driven spell, loadout and scenario definitions.
//!
//! Spells live in RON files, one per class; loadouts, scenarios and the
//! simulation config in TOML. Loaders turn them into validated `sim-core`
//! values (a [`sim_core::Spellbook`] built against a [`sim_core::Loadout`]).
//! Content never appears in encounter state.
//!
//! The class spell lists also ship embedded in the binary, see [`ClassPreset`].

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::ClassPreset;

#[cfg(feature = "loaders")]
pub use loaders::{
    BaseDamageDef, CasterDef, ConfigLoader, ContentFactory, CostDef, EffectDef, LoadoutLoader,
    PeriodicDef, PoolDef, RegenDef, RotationStep, ScenarioDef, ScenarioLoader, SpellDef,
    SpellLoader, TargetDef,
};
