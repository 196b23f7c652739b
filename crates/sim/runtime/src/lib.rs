//! Encounter runtime for `sim-core`.
//!
//! The core resolves casts and periodic ticks but owns no clock. This crate
//! supplies everything around it:
//! - [`queue`] orders the events the core schedules
//! - [`oracle`] implements the stats, mitigation, target and RNG oracles
//! - [`log`] provides combat log sinks
//! - [`encounter`] drives the clock, regeneration, deaths and rotations
//! - [`summary`] accumulates per-spell damage
pub mod encounter;
pub mod log;
pub mod oracle;
pub mod queue;
pub mod summary;

mod error;

pub use encounter::{Encounter, RegenRule, Rotation};
pub use error::{Result, RuntimeError};
pub use log::{FanoutLog, RecordingLog, TracingCombatLog};
pub use oracle::{ArmorMitigation, OracleManager, Roster, SeededRng, StatTable};
pub use queue::EventQueue;
pub use summary::{DamageSummary, SpellDamage};
