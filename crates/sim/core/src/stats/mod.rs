//! Resources, stat snapshots and the multiplier pipeline.
mod multiplier;
mod resources;
mod snapshot;

pub use multiplier::{BonusSpec, Loadout, ModifierSpec, MultiplierStack};
pub use resources::{ContinuousPool, DiscretePool, ResourceError, ResourceKind, ResourcePools};
pub use snapshot::{AttackerStats, DefenderStats};
