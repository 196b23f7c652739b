//! Combat log sinks.

use std::sync::Mutex;

use sim_core::{CombatLog, CombatLogEntry};

/// Writes every entry through `tracing` under the `combat_log` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingCombatLog;

impl CombatLog for TracingCombatLog {
    fn record(&self, entry: &CombatLogEntry) {
        match entry {
            CombatLogEntry::CastStarted {
                at,
                caster,
                spell,
                target,
                cast_time_ms,
            } => tracing::debug!(
                target: "combat_log",
                "[{}] {} begins {} on {} ({} ms)",
                at,
                caster,
                spell,
                target,
                cast_time_ms
            ),
            CombatLogEntry::CastRejected {
                at,
                caster,
                spell,
                code,
            } => tracing::debug!(target: "combat_log", "[{}] {} cannot cast {}: {}", at, caster, spell, code),
            CombatLogEntry::CastResolved {
                at,
                caster,
                spell,
                target,
                outcome,
                ..
            } => tracing::info!(
                target: "combat_log",
                "[{}] {} {} on {}: {}",
                at,
                caster,
                spell,
                target,
                outcome
            ),
            CombatLogEntry::Damage(record) => tracing::info!(
                target: "combat_log",
                "[{}] {} {} hits {} for {:.1} ({}{})",
                record.at,
                record.caster,
                record.spell,
                record.target,
                record.amount,
                record.outcome,
                if record.periodic { ", tick" } else { "" }
            ),
            CombatLogEntry::DotApplied {
                at,
                key,
                ticks,
                per_tick,
                refreshed,
            } => tracing::debug!(
                target: "combat_log",
                "[{}] {} on {}: {} ticks of {:.1}{}",
                at,
                key.spell,
                key.target,
                ticks,
                per_tick,
                if *refreshed { " (refreshed)" } else { "" }
            ),
            CombatLogEntry::DotExpired { at, key } => {
                tracing::debug!(target: "combat_log", "[{}] {} fades from {}", at, key.spell, key.target)
            }
            CombatLogEntry::DotCancelled { at, key } => {
                tracing::debug!(target: "combat_log", "[{}] {} removed from {}", at, key.spell, key.target)
            }
            CombatLogEntry::ResourceChanged {
                at,
                unit,
                kind,
                delta,
            } => tracing::trace!(target: "combat_log", "[{}] {} {} {:+.1}", at, unit, kind, delta),
            CombatLogEntry::SideEffectFailed {
                at,
                caster,
                spell,
                code,
            } => tracing::warn!(
                target: "combat_log",
                "[{}] {} {} side effect failed: {}",
                at,
                caster,
                spell,
                code
            ),
        }
    }
}

/// Keeps every entry in memory, for inspection after a run.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<CombatLogEntry>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<CombatLogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CombatLog for RecordingLog {
    fn record(&self, entry: &CombatLogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

/// Forwards each entry to every inner log, in order.
pub struct FanoutLog {
    sinks: Vec<Box<dyn CombatLog>>,
}

impl FanoutLog {
    pub fn new(sinks: Vec<Box<dyn CombatLog>>) -> Self {
        Self { sinks }
    }
}

impl CombatLog for FanoutLog {
    fn record(&self, entry: &CombatLogEntry) {
        for sink in &self.sinks {
            sink.record(entry);
        }
    }
}
