//! Deterministic spell casting and periodic damage resolution.
//!
//! `sim-core` defines the rules every ability definition plugs into: resource
//! pools, outcome rolls, multiplier composition, the spell cast state machine,
//! damage-over-time bookkeeping, and the finisher policy for abilities that
//! consume combo points. All state mutation flows through
//! [`engine::CombatEngine`]; the clock and event queue live with the caller,
//! which drives the engine through [`CombatEngine::advance_to`] and
//! [`CombatEngine::fire_event`].
pub mod combat;
pub mod config;
pub mod dot;
pub mod engine;
pub mod env;
pub mod error;
pub mod spell;
pub mod state;
pub mod stats;

pub use combat::{DefenseType, Outcome, OutcomeTable, RollCategory, SpellSchool};
pub use config::SimConfig;
pub use dot::{DotHandle, DotInstance, DotKey, DotManager, DotSnapshot, DotTag, RefreshPolicy};
pub use engine::{
    CastReport, CombatEngine, DamageRecord, EffectFailure, EngineError, EventPhase, EventReport,
    MAX_CAST_DEPTH, ScheduledEvent, SimEvent,
};
pub use env::{
    CombatLog, CombatLogEntry, MitigationOracle, MitigationQuery, OracleError, PcgRng, RngOracle,
    SimEnv, StatsOracle, TargetOracle, compute_seed,
};
pub use error::{ErrorContext, ErrorSeverity, SimError};
pub use spell::{
    BaseDamage, CastError, CastState, CastTiming, ConfigError, EffectError, EffectKind, PeriodicConfig,
    PointTable, Points, ProcMask, ResourceCost, ScalingStat, SideEffect, SpellBuilder,
    SpellConfig, SpellFlags, Spellbook, TargetScope, TickFormula,
};
pub use state::{ActionId, EncounterState, PendingCast, Timestamp, UnitId, UnitState};
pub use stats::{
    AttackerStats, BonusSpec, ContinuousPool, DefenderStats, DiscretePool, Loadout, ModifierSpec,
    MultiplierStack, ResourceError, ResourceKind, ResourcePools,
};
