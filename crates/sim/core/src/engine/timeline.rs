//! Handlers for scheduled events.

use super::{CombatEngine, DamageRecord, EngineError, EventReport, ScheduledEvent, SimEvent};
use crate::combat::Outcome;
use crate::dot::DotHandle;
use crate::env::{CombatLogEntry, MitigationQuery, SimEnv, roll_context};
use crate::error::ErrorContext;
use crate::spell::{CastContext, CastError, ProcMask};
use crate::state::UnitId;
use crate::stats::ResourceKind;

impl CombatEngine {
    pub(super) fn complete_cast(
        &mut self,
        caster: UnitId,
        env: &SimEnv<'_>,
    ) -> Result<EventReport, EngineError> {
        let now = self.state.now;
        let unit = self
            .state
            .unit_mut(caster)
            .ok_or(EngineError::UnknownUnit(caster))?;
        let Some(pending) = unit.casting.take() else {
            return Ok(EventReport::stale());
        };
        if now < pending.resume_at {
            let due = pending.resume_at;
            let context = ErrorContext::new(now)
                .with_unit(caster)
                .with_spell(pending.spell)
                .with_message("cast completion");
            unit.casting = Some(pending);
            return Err(EngineError::EventNotDue { due, context });
        }

        let spell = self
            .spell(pending.spell)
            .ok_or(CastError::UnknownSpell(pending.spell))?;
        let ctx = CastContext {
            caster,
            target: pending.target,
            spell,
            points: pending.points,
            paid: pending.paid,
            cast_time_ms: pending.resume_at.since(pending.started_at),
            outcome: None,
            depth: 0,
        };
        let cast = self.resolve(ctx, env);

        Ok(EventReport {
            cast: Some(cast),
            ..EventReport::default()
        })
    }

    /// Delivers one tick. Snapshot values are used as frozen; only mitigation
    /// and the optional tick crit are evaluated now.
    pub(super) fn tick_dot(
        &mut self,
        handle: DotHandle,
        env: &SimEnv<'_>,
    ) -> Result<EventReport, EngineError> {
        let now = self.state.now;
        let Some(instance) = self.dots.get(handle) else {
            return Ok(EventReport::stale());
        };
        let key = instance.key;
        let due = instance.next_tick_at;
        let can_crit = instance.snapshot.crit_chance > 0.0;

        if now < due {
            let context = ErrorContext::new(now)
                .with_unit(key.caster)
                .with_spell(key.spell)
                .with_message("periodic tick");
            return Err(EngineError::EventNotDue { due, context });
        }

        let mut report = EventReport::default();
        if !self.state.is_valid_target(key.target) {
            self.dots.cancel(handle);
            env.record(CombatLogEntry::DotCancelled { at: now, key });
            report.cancelled.push(key);
            return Ok(report);
        }

        // Resolve oracles before the tick is consumed so a missing one leaves
        // the instance untouched.
        let mitigation = env.mitigation()?;
        if can_crit {
            env.rng()?;
        }

        let Some(tick) = self.dots.on_tick(handle) else {
            return Ok(EventReport::stale());
        };
        let snapshot = tick.snapshot;

        let mut outcome = Outcome::Hit;
        let mut amount = snapshot.per_tick;
        if can_crit && self.draw(key.caster, roll_context::TICK_CRIT, env)? < snapshot.crit_chance {
            outcome = Outcome::Crit;
            amount *= snapshot.crit_multiplier;
        }
        amount *= mitigation.damage_taken(&MitigationQuery {
            attacker: key.caster,
            target: key.target,
            school: snapshot.school,
            defense: snapshot.defense,
            periodic: true,
            tag: snapshot.tag,
        });
        let amount = amount.max(0.0);

        let record = DamageRecord {
            at: now,
            caster: key.caster,
            target: key.target,
            spell: key.spell,
            outcome,
            school: snapshot.school,
            proc_mask: ProcMask::PERIODIC_DAMAGE,
            amount,
            threat: amount * snapshot.threat_multiplier,
            periodic: true,
        };
        tracing::trace!(
            "{} tick on {}: {:.1}, {} left",
            key.spell,
            key.target,
            amount,
            tick.remaining_ticks
        );
        env.record(CombatLogEntry::Damage(record.clone()));
        report.damage.push(record);

        match tick.next_tick_at {
            Some(at) => report
                .scheduled
                .push(ScheduledEvent::new(at, SimEvent::DotTick { handle })),
            None => {
                env.record(CombatLogEntry::DotExpired { at: now, key });
                report.expired.push(key);
            }
        }
        Ok(report)
    }

    pub(super) fn regen(
        &mut self,
        unit: UnitId,
        kind: ResourceKind,
        amount: f64,
        env: &SimEnv<'_>,
    ) -> Result<EventReport, EngineError> {
        let now = self.state.now;
        let state = self
            .state
            .unit_mut(unit)
            .ok_or(EngineError::UnknownUnit(unit))?;
        if !state.alive {
            return Ok(EventReport::stale());
        }

        let delta = state.pools.add(kind, amount)?;
        if delta != 0.0 {
            env.record(CombatLogEntry::ResourceChanged {
                at: now,
                unit,
                kind,
                delta,
            });
        }
        Ok(EventReport::default())
    }
}
