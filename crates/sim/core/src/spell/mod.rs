//! Spells: configuration, effects, cast state and the finisher policy.
mod book;
mod cast;
mod config;
mod effect;
mod error;
pub mod finisher;

pub use book::Spellbook;
pub use cast::{CastContext, CastState};
pub use config::{CastTiming, ProcMask, ResourceCost, SpellBuilder, SpellConfig, SpellFlags};
pub use effect::{
    BaseDamage, DamageInput, EffectKind, PeriodicConfig, ScalingStat, SideEffect, TargetScope,
};
pub use error::{CastError, ConfigError, EffectError};
pub use finisher::{PointTable, Points, TickFormula};
