//! Cast pipeline and event handling.
//!
//! [`CombatEngine`] owns the encounter state, the spellbook and the periodic
//! effect manager. Callers drive it two ways: [`CombatEngine::cast`] starts a
//! cast for a unit, and [`CombatEngine::fire_event`] delivers an event the
//! engine previously asked to be scheduled. Both return reports listing the
//! follow-up events the caller's scheduler must register. The engine never
//! owns a queue itself.

mod error;
mod events;
mod report;
mod resolve;
mod timeline;

pub use error::EngineError;
pub use events::{EventPhase, ScheduledEvent, SimEvent};
pub use report::{CastReport, DamageRecord, EffectFailure, EventReport};

use std::sync::Arc;

use crate::config::SimConfig;
use crate::dot::{DotHandle, DotInstance, DotManager};
use crate::env::{CombatLogEntry, OracleError, SimEnv, compute_seed};
use crate::error::SimError;
use crate::spell::{
    CastContext, CastError, CastState, ConfigError, Points, SpellConfig, Spellbook, finisher,
};
use crate::state::{ActionId, EncounterState, PendingCast, Timestamp, UnitId, UnitState};

/// Nesting limit for wrapper spells casting other spells.
pub const MAX_CAST_DEPTH: u8 = 4;

pub struct CombatEngine {
    config: SimConfig,
    state: EncounterState,
    spells: Spellbook,
    dots: DotManager,
}

impl CombatEngine {
    pub fn new(config: SimConfig) -> Self {
        Self::with_spellbook(config, Spellbook::new())
    }

    pub fn with_spellbook(config: SimConfig, spells: Spellbook) -> Self {
        Self {
            config,
            state: EncounterState::new(),
            spells,
            dots: DotManager::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn now(&self) -> Timestamp {
        self.state.now
    }

    pub fn spells(&self) -> &Spellbook {
        &self.spells
    }

    pub fn dots(&self) -> &DotManager {
        &self.dots
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.state.unit(id)
    }

    /// Direct access for callers that adjust pools or flags between events.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.state.unit_mut(id)
    }

    pub fn add_unit(&mut self, unit: UnitState) {
        self.state.units.insert(unit.id, unit);
    }

    pub fn register_spell(&mut self, spell: SpellConfig) -> Result<(), ConfigError> {
        self.spells.register(spell)
    }

    /// Checks that every spell referenced by a wrapper effect is registered.
    pub fn validate_spells(&self) -> Result<(), ConfigError> {
        self.spells.validate()
    }

    /// Moves the clock forward.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::TimeRegression` if `at` lies before the current time.
    pub fn advance_to(&mut self, at: Timestamp) -> Result<(), EngineError> {
        if at < self.state.now {
            return Err(EngineError::TimeRegression {
                now: self.state.now,
                requested: at,
            });
        }
        self.state.now = at;
        Ok(())
    }

    /// Starts a cast of `spell` by `caster` on `target` at the current time.
    ///
    /// Rejections (cooldown, resources, busy caster, unknown ids, dead target,
    /// a collaborator the spell needs but `env` lacks) happen before any state
    /// changes. Once the cost is paid the cast is
    /// committed: with a cast time it parks in `Casting` and the report carries
    /// a `CastComplete` event; without one it resolves immediately.
    pub fn cast(
        &mut self,
        caster: UnitId,
        spell: ActionId,
        target: UnitId,
        env: &SimEnv<'_>,
    ) -> Result<CastReport, CastError> {
        let result = self.start_cast(caster, spell, target, env);
        if let Err(err) = &result {
            tracing::debug!(
                "{} rejected cast of {} on {}: {}",
                caster,
                spell,
                target,
                err
            );
            env.record(CombatLogEntry::CastRejected {
                at: self.state.now,
                caster,
                spell,
                code: err.error_code(),
            });
        }
        result
    }

    fn start_cast(
        &mut self,
        caster: UnitId,
        spell_id: ActionId,
        target: UnitId,
        env: &SimEnv<'_>,
    ) -> Result<CastReport, CastError> {
        let now = self.state.now;
        let spell = self
            .spells
            .get(spell_id)
            .ok_or(CastError::UnknownSpell(spell_id))?;

        let unit = self
            .state
            .unit(caster)
            .filter(|unit| unit.alive)
            .ok_or(CastError::UnknownUnit(caster))?;
        if let Some(pending) = &unit.casting {
            return Err(CastError::AlreadyCasting {
                resume_at: pending.resume_at,
            });
        }
        if spell.triggers_gcd() && unit.on_gcd(now) {
            return Err(CastError::OnGlobalCooldown {
                ready_at: unit.gcd_ready_at,
            });
        }
        if !self.state.is_valid_target(target) {
            return Err(CastError::InvalidTarget(target));
        }

        let stats = env
            .stats()?
            .attacker(caster)
            .ok_or(OracleError::UnitStatsNotFound(caster))?;
        if spell.roll.needs_roll() {
            env.stats()?
                .defender(target)
                .ok_or(OracleError::UnitStatsNotFound(target))?;
        }
        self.require_oracles(&spell, env, 0)?;

        let unit = self
            .state
            .unit_mut(caster)
            .ok_or(CastError::UnknownUnit(caster))?;

        // Charge is all-or-nothing; nothing before this point mutates state.
        let paid = match &spell.cost {
            Some(cost) => {
                let amount = cost.amount(&stats);
                unit.pools.charge(cost.kind, amount)?;
                Some((cost.kind, amount))
            }
            None => None,
        };

        if spell.triggers_gcd() {
            unit.gcd_ready_at = now + spell.timing.gcd(&stats, &self.config);
        }
        let points = if spell.is_finisher() {
            finisher::observe(&unit.pools)
        } else {
            Points::ZERO
        };
        let cast_time_ms = spell.timing.cast_time(&stats);

        if let Some((kind, amount)) = paid {
            env.record(CombatLogEntry::ResourceChanged {
                at: now,
                unit: caster,
                kind,
                delta: -amount,
            });
        }
        env.record(CombatLogEntry::CastStarted {
            at: now,
            caster,
            spell: spell_id,
            target,
            cast_time_ms,
        });

        if cast_time_ms > 0 {
            let resume_at = now + cast_time_ms;
            unit.casting = Some(PendingCast {
                spell: spell_id,
                target,
                points,
                paid,
                started_at: now,
                resume_at,
            });
            tracing::debug!("{} casting {} until {}", caster, spell_id, resume_at);

            let mut report = CastReport::new(caster, spell_id, target, points);
            report.state = CastState::Casting { resume_at };
            report.paid = paid;
            report
                .scheduled
                .push(ScheduledEvent::new(resume_at, SimEvent::CastComplete { caster }));
            return Ok(report);
        }

        let ctx = CastContext {
            caster,
            target,
            spell,
            points,
            paid,
            cast_time_ms,
            outcome: None,
            depth: 0,
        };
        Ok(self.resolve(ctx, env))
    }

    /// Delivers an event previously returned in a report.
    ///
    /// Events whose subject no longer exists (a cancelled or refreshed
    /// periodic effect, an interrupted cast) produce a stale, empty report.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EventNotDue` if the clock has not reached the
    /// event's due time.
    pub fn fire_event(
        &mut self,
        event: SimEvent,
        env: &SimEnv<'_>,
    ) -> Result<EventReport, EngineError> {
        match event {
            SimEvent::CastComplete { caster } => self.complete_cast(caster, env),
            SimEvent::DotTick { handle } => self.tick_dot(handle, env),
            SimEvent::ResourceRegen { unit, kind, amount } => self.regen(unit, kind, amount, env),
        }
    }

    /// Cancels one periodic effect. Its queued tick becomes stale.
    pub fn cancel_dot(&mut self, handle: DotHandle, env: &SimEnv<'_>) -> Option<DotInstance> {
        let instance = self.dots.cancel(handle)?;
        env.record(CombatLogEntry::DotCancelled {
            at: self.state.now,
            key: instance.key,
        });
        Some(instance)
    }

    /// Marks a unit dead, drops its pending cast and cancels every periodic
    /// effect ticking on it.
    pub fn remove_unit(&mut self, id: UnitId, env: &SimEnv<'_>) -> Vec<DotInstance> {
        let Some(unit) = self.state.unit_mut(id) else {
            return Vec::new();
        };
        unit.alive = false;
        unit.casting = None;

        let cancelled = self.dots.cancel_target(id);
        for instance in &cancelled {
            env.record(CombatLogEntry::DotCancelled {
                at: self.state.now,
                key: instance.key,
            });
        }
        tracing::debug!("{} removed, {} periodic effects cancelled", id, cancelled.len());
        cancelled
    }

    /// Draws a uniform value for `unit`, advancing the roll nonce.
    fn draw(&mut self, unit: UnitId, context: u32, env: &SimEnv<'_>) -> Result<f64, OracleError> {
        let rng = env.rng()?;
        let nonce = self.state.next_nonce();
        Ok(rng.uniform(compute_seed(self.config.seed, nonce, unit.0, context)))
    }

    fn spell(&self, id: ActionId) -> Option<Arc<SpellConfig>> {
        self.spells.get(id)
    }
}
