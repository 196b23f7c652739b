//! Resolution of a committed cast: outcome roll, effect dispatch, side effects.

use std::fmt::Display;
use std::sync::Arc;

use super::{CastReport, CombatEngine, DamageRecord, EffectFailure, MAX_CAST_DEPTH, ScheduledEvent, SimEvent};
use crate::combat::{DefenseType, Outcome, OutcomeTable};
use crate::dot::{Applied, DotKey, DotSnapshot};
use crate::env::{CombatLogEntry, MitigationQuery, OracleError, SimEnv, roll_context};
use crate::error::SimError;
use crate::spell::{
    BaseDamage, CastContext, CastState, DamageInput, EffectError, EffectKind,
    PeriodicConfig, SideEffect, SpellConfig, TargetScope, finisher,
};
use crate::state::{ActionId, UnitId};
use crate::stats::{AttackerStats, ResourceKind};

impl CombatEngine {
    /// Runs `Resolving -> Applied | Missed` for a committed cast.
    ///
    /// The cost is already paid, so nothing here fails the cast. An outcome
    /// that cannot be rolled counts as a miss; a primary effect that fails is
    /// recorded on the report and leaves the finisher's points in place.
    /// Failures of composite children, wrapper sub-casts and side effects are
    /// recorded the same way and never undo what already happened.
    pub(super) fn resolve(&mut self, mut ctx: CastContext, env: &SimEnv<'_>) -> CastReport {
        let mut report = CastReport::new(ctx.caster, ctx.spell.id, ctx.target, ctx.points);
        report.paid = ctx.paid;
        report.state = CastState::Resolving;
        let spell = Arc::clone(&ctx.spell);

        // A target that died while the cast was in flight cannot be hit.
        let outcome = if !self.state.is_valid_target(ctx.target) {
            Outcome::Miss
        } else {
            match self.roll_outcome(&ctx, env) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.isolate(&ctx, spell.id, &err, env, &mut report);
                    Outcome::Miss
                }
            }
        };
        ctx.outcome = Some(outcome);
        report.outcome = Some(outcome);

        if outcome.landed() {
            let applied = match self.apply_effect(&spell.effect, &ctx, env, &mut report) {
                Ok(()) => true,
                Err(err) => {
                    self.isolate(&ctx, spell.id, &err, env, &mut report);
                    false
                }
            };

            for side_effect in &spell.side_effects {
                if let Err(err) = self.apply_side_effect(side_effect, &ctx, env) {
                    self.isolate(&ctx, spell.id, &err, env, &mut report);
                }
            }

            if applied && spell.is_finisher() && ctx.depth == 0 {
                if let Some(unit) = self.state.unit_mut(ctx.caster) {
                    report.points_spent = finisher::consume(&mut unit.pools).get();
                }
            }
            report.state = CastState::Applied;
        } else {
            report.refunded = self.refund(&ctx, env);
            report.state = CastState::Missed;
        }

        tracing::debug!(
            "{} {} on {}: {} ({:?})",
            ctx.caster,
            spell.name,
            ctx.target,
            outcome,
            report.state
        );
        env.record(CombatLogEntry::CastResolved {
            at: self.state.now,
            caster: ctx.caster,
            spell: spell.id,
            target: ctx.target,
            outcome,
            state: report.state,
        });
        report
    }

    /// Fails with the first collaborator a cast of `spell` would reach for
    /// that `env` does not provide. Runs before the cost is charged.
    pub(super) fn require_oracles(
        &self,
        spell: &SpellConfig,
        env: &SimEnv<'_>,
        depth: u8,
    ) -> Result<(), OracleError> {
        if spell.roll.needs_roll() {
            env.rng()?;
        }
        self.require_effect_oracles(&spell.effect, env, depth)
    }

    fn require_effect_oracles(
        &self,
        effect: &EffectKind,
        env: &SimEnv<'_>,
        depth: u8,
    ) -> Result<(), OracleError> {
        match effect {
            EffectKind::DirectDamage { base } => {
                env.mitigation()?;
                if base.needs_variance() {
                    env.rng()?;
                }
            }
            EffectKind::PeriodicDamage(periodic) => {
                env.mitigation()?;
                if periodic.can_crit || periodic.per_tick.needs_variance() {
                    env.rng()?;
                }
            }
            EffectKind::ResourceGenerator { .. } => {}
            EffectKind::CastOnTargets { spell, scope } => {
                if *scope == TargetScope::AllEnemies {
                    env.targets()?;
                }
                if depth < MAX_CAST_DEPTH {
                    if let Some(child) = self.spell(*spell) {
                        self.require_oracles(&child, env, depth + 1)?;
                    }
                }
            }
            EffectKind::Composite(children) => {
                for child in children {
                    self.require_effect_oracles(child, env, depth)?;
                }
            }
        }
        Ok(())
    }

    fn roll_outcome(&mut self, ctx: &CastContext, env: &SimEnv<'_>) -> Result<Outcome, OracleError> {
        let spell = &ctx.spell;
        if !spell.roll.needs_roll() {
            return Ok(Outcome::Hit);
        }

        let oracle = env.stats()?;
        let attacker = oracle
            .attacker(ctx.caster)
            .ok_or(OracleError::UnitStatsNotFound(ctx.caster))?;
        let defender = oracle
            .defender(ctx.target)
            .ok_or(OracleError::UnitStatsNotFound(ctx.target))?;

        let table = OutcomeTable::build(spell.roll, &attacker, &defender, spell.bonus_crit);
        let draw = self.draw(ctx.caster, roll_context::OUTCOME, env)?;
        Ok(table.select(draw))
    }

    /// Returns part of the paid cost after a miss; finisher points stay put.
    fn refund(&mut self, ctx: &CastContext, env: &SimEnv<'_>) -> f64 {
        let (Some(cost), Some((kind, paid))) = (ctx.spell.cost.as_ref(), ctx.paid) else {
            return 0.0;
        };
        let amount = paid * cost.refund_on_miss;
        if amount <= 0.0 {
            return 0.0;
        }
        match self.add_resource(ctx.caster, kind, amount, env) {
            Ok(delta) => delta,
            Err(err) => {
                tracing::warn!("refund to {} failed: {}", ctx.caster, err);
                0.0
            }
        }
    }

    fn apply_effect(
        &mut self,
        effect: &EffectKind,
        ctx: &CastContext,
        env: &SimEnv<'_>,
        report: &mut CastReport,
    ) -> Result<(), EffectError> {
        match effect {
            EffectKind::DirectDamage { base } => self.direct_damage(base, ctx, env, report),
            EffectKind::PeriodicDamage(periodic) => self.apply_periodic(periodic, ctx, env, report),
            EffectKind::ResourceGenerator { kind, amount } => self
                .add_resource(ctx.caster, *kind, *amount, env)
                .map(|_| ()),
            EffectKind::CastOnTargets { spell, scope } => {
                self.cast_on_targets(*spell, *scope, ctx, env, report)
            }
            EffectKind::Composite(children) => {
                for child in children {
                    if let Err(err) = self.apply_effect(child, ctx, env, report) {
                        self.isolate(ctx, ctx.spell.id, &err, env, report);
                    }
                }
                Ok(())
            }
        }
    }

    fn direct_damage(
        &mut self,
        base: &BaseDamage,
        ctx: &CastContext,
        env: &SimEnv<'_>,
        report: &mut CastReport,
    ) -> Result<(), EffectError> {
        let spell = &ctx.spell;
        let stats = attacker_stats(ctx.caster, env)?;
        let mitigation = env.mitigation()?;
        let outcome = ctx.outcome.unwrap_or(Outcome::Hit);

        let mut amount = self.evaluate(base, ctx, &stats, env)?
            * spell.damage_multiplier()
            * stats.damage_multiplier;
        if outcome.is_crit() {
            amount *= spell.crit_multiplier;
        }
        amount *= mitigation.damage_taken(&MitigationQuery {
            attacker: ctx.caster,
            target: ctx.target,
            school: spell.school,
            defense: spell.defense,
            periodic: false,
            tag: None,
        });
        let amount = amount.max(0.0);

        let record = DamageRecord {
            at: self.state.now,
            caster: ctx.caster,
            target: ctx.target,
            spell: spell.id,
            outcome,
            school: spell.school,
            proc_mask: spell.proc_mask,
            amount,
            threat: amount * spell.threat_multiplier(),
            periodic: false,
        };
        env.record(CombatLogEntry::Damage(record.clone()));
        report.damage.push(record);
        Ok(())
    }

    /// Freezes per-tick damage and tick count, then hands the instance to the
    /// periodic effect manager. Mitigation is applied per tick, not here.
    fn apply_periodic(
        &mut self,
        periodic: &PeriodicConfig,
        ctx: &CastContext,
        env: &SimEnv<'_>,
        report: &mut CastReport,
    ) -> Result<(), EffectError> {
        let spell = &ctx.spell;
        let stats = attacker_stats(ctx.caster, env)?;
        let per_tick = self.evaluate(&periodic.per_tick, ctx, &stats, env)?
            * spell.damage_multiplier()
            * stats.damage_multiplier;

        let snapshot = DotSnapshot {
            per_tick: per_tick.max(0.0),
            ticks: periodic.ticks.ticks(ctx.points),
            interval_ms: periodic.interval_ms,
            crit_chance: if periodic.can_crit {
                crit_chance(spell, &stats)
            } else {
                0.0
            },
            crit_multiplier: spell.crit_multiplier,
            school: spell.school,
            defense: spell.defense,
            tag: periodic.tag,
            threat_multiplier: spell.threat_multiplier(),
        };

        let key = DotKey {
            caster: ctx.caster,
            spell: spell.id,
            target: ctx.target,
        };
        let now = self.state.now;
        let application = self.dots.apply(key, snapshot, periodic.refresh, now);
        let frozen_per_tick = self
            .dots
            .get(application.handle)
            .map_or(snapshot.per_tick, |instance| instance.snapshot.per_tick);

        tracing::debug!(
            "{} applied to {}: {} ticks of {:.1} ({:?})",
            spell.name,
            ctx.target,
            snapshot.ticks,
            frozen_per_tick,
            application.applied
        );
        env.record(CombatLogEntry::DotApplied {
            at: now,
            key,
            ticks: snapshot.ticks,
            per_tick: frozen_per_tick,
            refreshed: !matches!(application.applied, Applied::Created),
        });
        report.scheduled.push(ScheduledEvent::new(
            application.first_tick_at,
            SimEvent::DotTick {
                handle: application.handle,
            },
        ));
        Ok(())
    }

    /// Casts `spell_id` on each target in `scope` as a child of `ctx`.
    ///
    /// Each child rolls its own outcome. One failing child does not stop the
    /// others.
    fn cast_on_targets(
        &mut self,
        spell_id: ActionId,
        scope: TargetScope,
        ctx: &CastContext,
        env: &SimEnv<'_>,
        report: &mut CastReport,
    ) -> Result<(), EffectError> {
        if ctx.depth >= MAX_CAST_DEPTH {
            return Err(EffectError::TooDeep(MAX_CAST_DEPTH));
        }
        let child = self
            .spell(spell_id)
            .ok_or(EffectError::UnknownSpell(spell_id))?;
        let targets = match scope {
            TargetScope::Primary => vec![ctx.target],
            TargetScope::AllEnemies => env.targets()?.enemies_of(ctx.caster),
        };

        for target in targets {
            if !self.state.is_valid_target(target) {
                continue;
            }
            let child_report = self.resolve(ctx.child(Arc::clone(&child), target), env);
            report.absorb(child_report);
        }
        Ok(())
    }

    fn apply_side_effect(
        &mut self,
        side_effect: &SideEffect,
        ctx: &CastContext,
        env: &SimEnv<'_>,
    ) -> Result<(), EffectError> {
        match side_effect {
            SideEffect::BreakStealth => {
                let unit = self
                    .state
                    .unit_mut(ctx.caster)
                    .ok_or(EffectError::UnknownUnit(ctx.caster))?;
                unit.stealthed = false;
                Ok(())
            }
            SideEffect::GainPoints(points) => self
                .add_resource(ctx.caster, ResourceKind::ComboPoints, f64::from(*points), env)
                .map(|_| ()),
            SideEffect::RestoreResource { kind, amount } => self
                .add_resource(ctx.caster, *kind, *amount, env)
                .map(|_| ()),
        }
    }

    fn add_resource(
        &mut self,
        unit: UnitId,
        kind: ResourceKind,
        amount: f64,
        env: &SimEnv<'_>,
    ) -> Result<f64, EffectError> {
        let now = self.state.now;
        let state = self
            .state
            .unit_mut(unit)
            .ok_or(EffectError::UnknownUnit(unit))?;
        let delta = state.pools.add(kind, amount)?;
        if delta != 0.0 {
            env.record(CombatLogEntry::ResourceChanged {
                at: now,
                unit,
                kind,
                delta,
            });
        }
        Ok(delta)
    }

    fn evaluate(
        &mut self,
        base: &BaseDamage,
        ctx: &CastContext,
        stats: &AttackerStats,
        env: &SimEnv<'_>,
    ) -> Result<f64, EffectError> {
        let variance = if base.needs_variance() {
            self.draw(ctx.caster, roll_context::VARIANCE, env)?
        } else {
            0.0
        };

        let dots = &self.dots;
        let (caster, target) = (ctx.caster, ctx.target);
        let dot_active = move |spell: ActionId| {
            dots.is_active(&DotKey {
                caster,
                spell,
                target,
            })
        };
        Ok(base.evaluate(&DamageInput {
            stats,
            points: ctx.points,
            variance,
            dot_active: &dot_active,
        }))
    }

    fn isolate<E: SimError + Display>(
        &self,
        ctx: &CastContext,
        spell: ActionId,
        err: &E,
        env: &SimEnv<'_>,
        report: &mut CastReport,
    ) {
        tracing::warn!("{} effect of {} failed for {}: {}", ctx.caster, spell, ctx.target, err);
        env.record(CombatLogEntry::SideEffectFailed {
            at: self.state.now,
            caster: ctx.caster,
            spell,
            code: err.error_code(),
        });
        report.failures.push(EffectFailure {
            spell,
            code: err.error_code(),
            message: err.to_string(),
        });
    }
}

fn attacker_stats(caster: UnitId, env: &SimEnv<'_>) -> Result<AttackerStats, OracleError> {
    env.stats()?
        .attacker(caster)
        .ok_or(OracleError::UnitStatsNotFound(caster))
}

/// Crit chance captured for ticks that can crit.
fn crit_chance(spell: &SpellConfig, stats: &AttackerStats) -> f64 {
    let base = match spell.defense {
        DefenseType::Melee | DefenseType::Ranged => stats.melee_crit,
        DefenseType::None | DefenseType::Magic => stats.spell_crit,
    };
    (base + spell.bonus_crit).clamp(0.0, 1.0)
}
