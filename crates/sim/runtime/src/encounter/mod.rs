//! Encounter driver: owns the engine, the clock and the event queue.
//!
//! The core never schedules anything itself. Every report it returns carries
//! the events it wants delivered; [`Encounter`] queues them, advances the
//! clock to each one in order and fires it back. Periodic regeneration and
//! scripted deaths live here as well.
mod rotation;
mod setup;

use std::collections::BTreeMap;

use sim_core::{
    ActionId, CastError, CastReport, CombatEngine, CombatLog, DotInstance, EventReport,
    ResourceKind, ScheduledEvent, SimError, SimEvent, StatsOracle, Timestamp, UnitId,
};

use crate::error::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::queue::EventQueue;
use crate::summary::DamageSummary;

pub use rotation::Rotation;

/// Fixed regeneration of one pool, re-armed every time it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegenRule {
    pub unit: UnitId,
    pub kind: ResourceKind,
    pub amount: f64,
    pub interval_ms: u64,
}

pub struct Encounter {
    engine: CombatEngine,
    queue: EventQueue,
    oracles: OracleManager,
    log: Box<dyn CombatLog>,
    regen: Vec<RegenRule>,
    deaths: BTreeMap<Timestamp, Vec<UnitId>>,
    summary: DamageSummary,
}

impl Encounter {
    pub fn new(engine: CombatEngine, oracles: OracleManager, log: Box<dyn CombatLog>) -> Self {
        Self {
            engine,
            queue: EventQueue::new(),
            oracles,
            log,
            regen: Vec::new(),
            deaths: BTreeMap::new(),
            summary: DamageSummary::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.engine.now()
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn summary(&self) -> &DamageSummary {
        &self.summary
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Starts regenerating `rule.amount` every `rule.interval_ms` from now on.
    pub fn add_regen(&mut self, rule: RegenRule) {
        self.queue.push(Self::regen_event(&rule, self.now()));
        self.regen.push(rule);
    }

    /// Removes `unit` from the encounter once the clock reaches `at`.
    pub fn schedule_death(&mut self, unit: UnitId, at: Timestamp) {
        self.deaths.entry(at).or_default().push(unit);
    }

    /// Casts now and queues whatever the cast scheduled.
    pub fn cast(&mut self, caster: UnitId, spell: ActionId, target: UnitId) -> Result<CastReport> {
        let env = self.oracles.as_sim_env(self.log.as_ref());
        let report = self.engine.cast(caster, spell, target, &env)?;
        self.queue.push_all(&report.scheduled);
        self.summary.record_cast(&report);
        Ok(report)
    }

    /// Fires every event and death due up to `until`, then moves the clock
    /// to `until`. Deaths win ties against events due at the same instant.
    pub fn run_until(&mut self, until: Timestamp) -> Result<Vec<EventReport>> {
        let mut reports = Vec::new();
        loop {
            let next_event = self.queue.peek_time().filter(|at| *at <= until);
            let next_death = self
                .deaths
                .first_key_value()
                .map(|(at, _)| *at)
                .filter(|at| *at <= until);

            match (next_event, next_death) {
                (None, None) => break,
                (event, Some(death)) if event.is_none_or(|event| death <= event) => {
                    self.engine.advance_to(death)?;
                    for unit in self.deaths.remove(&death).unwrap_or_default() {
                        self.kill(unit);
                    }
                }
                _ => {
                    let Some(event) = self.queue.pop_due(until) else {
                        break;
                    };
                    reports.push(self.fire(event)?);
                }
            }
        }
        if until > self.now() {
            self.engine.advance_to(until)?;
        }
        Ok(reports)
    }

    fn fire(&mut self, event: ScheduledEvent) -> Result<EventReport> {
        self.engine.advance_to(event.at)?;
        let env = self.oracles.as_sim_env(self.log.as_ref());
        let report = self.engine.fire_event(event.event, &env)?;

        self.queue.push_all(report.scheduled_events());
        if let Some(cast) = &report.cast {
            self.summary.record_cast(cast);
        }
        for record in &report.damage {
            self.summary.record_damage(record);
        }
        if let SimEvent::ResourceRegen { unit, kind, .. } = event.event {
            if !report.stale {
                if let Some(rule) = self.regen.iter().find(|r| r.unit == unit && r.kind == kind) {
                    self.queue.push(Self::regen_event(rule, event.at));
                }
            }
        }
        Ok(report)
    }

    fn regen_event(rule: &RegenRule, from: Timestamp) -> ScheduledEvent {
        ScheduledEvent::new(
            from + rule.interval_ms,
            SimEvent::ResourceRegen {
                unit: rule.unit,
                kind: rule.kind,
                amount: rule.amount,
            },
        )
    }

    /// Removes `unit` from the roster and the engine, cancelling every
    /// periodic effect on it.
    pub fn kill(&mut self, unit: UnitId) -> Vec<DotInstance> {
        self.oracles.roster.remove(unit);
        let env = self.oracles.as_sim_env(self.log.as_ref());
        let cancelled = self.engine.remove_unit(unit, &env);
        tracing::info!("{} died at {}", unit, self.now());
        cancelled
    }

    /// When `caster` may start its next spell, or `None` for unknown units.
    pub fn ready_at(&self, caster: UnitId) -> Option<Timestamp> {
        let unit = self.engine.unit(caster)?;
        Some(match &unit.casting {
            Some(pending) => pending.resume_at,
            None => unit.gcd_ready_at.max(self.now()),
        })
    }

    /// Runs `rotation` for `caster` against the roster's primary target until
    /// `until`, or until no target is left.
    pub fn run_rotation(&mut self, caster: UnitId, rotation: &Rotation, until: Timestamp) -> Result<()> {
        if self.oracles.stats.attacker(caster).is_none() {
            return Err(RuntimeError::MissingStats(caster));
        }
        let mut last_attempt = None;
        while self.now() < until {
            let now = self.now();
            let ready = self
                .ready_at(caster)
                .ok_or(RuntimeError::Cast(CastError::UnknownUnit(caster)))?;
            let Some(target) = self.oracles.roster.primary() else {
                tracing::info!("No targets left at {}", now);
                break;
            };

            if ready <= now && last_attempt != Some(now) {
                last_attempt = Some(now);
                if let Some(spell) = rotation.next(self, caster, target) {
                    match self.cast(caster, spell, target) {
                        Ok(_) => continue,
                        Err(RuntimeError::Cast(err)) if err.severity().is_recoverable() => {
                            tracing::debug!("{} waits: {}", caster, err);
                        }
                        Err(err) => return Err(err),
                    }
                }
            }

            let wake = [
                self.queue.peek_time(),
                self.deaths.first_key_value().map(|(at, _)| *at),
                self.ready_at(caster).filter(|at| *at > now),
            ]
            .into_iter()
            .flatten()
            .min()
            .filter(|at| *at <= until)
            .unwrap_or(until);
            self.run_until(wake)?;
        }
        Ok(())
    }
}
