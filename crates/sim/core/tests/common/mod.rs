#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use sim_core::{
    AttackerStats, CombatEngine, CombatLog, CombatLogEntry, ContinuousPool, DamageRecord,
    DefenderStats, EventReport, Loadout, MitigationOracle, MitigationQuery, PcgRng, ResourceKind,
    ResourcePools, ScheduledEvent, SimConfig, SimEnv, SpellBuilder, SpellConfig, StatsOracle,
    TargetOracle, Timestamp, UnitId, UnitState,
};

pub const ROGUE: UnitId = UnitId(1);
pub const BOSS: UnitId = UnitId(100);
pub const ADD: UnitId = UnitId(101);

/// Stats that tests can change between events.
#[derive(Default)]
pub struct Stats {
    attackers: Mutex<BTreeMap<UnitId, AttackerStats>>,
    defenders: Mutex<BTreeMap<UnitId, DefenderStats>>,
}

impl Stats {
    pub fn set_attacker(&self, unit: UnitId, stats: AttackerStats) {
        self.attackers.lock().unwrap().insert(unit, stats);
    }

    pub fn set_defender(&self, unit: UnitId, stats: DefenderStats) {
        self.defenders.lock().unwrap().insert(unit, stats);
    }
}

impl StatsOracle for Stats {
    fn attacker(&self, unit: UnitId) -> Option<AttackerStats> {
        self.attackers.lock().unwrap().get(&unit).copied()
    }

    /// Units without explicit avoidance never miss, dodge or parry.
    fn defender(&self, unit: UnitId) -> Option<DefenderStats> {
        Some(
            self.defenders
                .lock()
                .unwrap()
                .get(&unit)
                .copied()
                .unwrap_or_default(),
        )
    }
}

pub struct NoMitigation;

impl MitigationOracle for NoMitigation {
    fn damage_taken(&self, _query: &MitigationQuery) -> f64 {
        1.0
    }
}

pub struct Enemies(pub Vec<UnitId>);

impl TargetOracle for Enemies {
    fn enemies_of(&self, _caster: UnitId) -> Vec<UnitId> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct Recorder(Mutex<Vec<CombatLogEntry>>);

impl Recorder {
    pub fn entries(&self) -> Vec<CombatLogEntry> {
        self.0.lock().unwrap().clone()
    }
}

impl CombatLog for Recorder {
    fn record(&self, entry: &CombatLogEntry) {
        self.0.lock().unwrap().push(entry.clone());
    }
}

pub struct Fixture {
    pub stats: Stats,
    pub mitigation: NoMitigation,
    pub enemies: Enemies,
    pub rng: PcgRng,
    pub log: Recorder,
}

impl Fixture {
    pub fn new() -> Self {
        let stats = Stats::default();
        stats.set_attacker(ROGUE, AttackerStats::with_attack_power(1_000.0));
        Self {
            stats,
            mitigation: NoMitigation,
            enemies: Enemies(vec![BOSS]),
            rng: PcgRng,
            log: Recorder::default(),
        }
    }

    pub fn env(&self) -> SimEnv<'_> {
        SimEnv::with_all(
            &self.stats,
            &self.mitigation,
            &self.enemies,
            &self.rng,
            &self.log,
        )
    }
}

/// Minimal scheduler: earliest event first, then phase, then insertion order.
#[derive(Default)]
pub struct Queue {
    pending: Vec<(u64, ScheduledEvent)>,
    seq: u64,
}

impl Queue {
    pub fn push_all<'a>(&mut self, events: impl IntoIterator<Item = &'a ScheduledEvent>) {
        for event in events {
            self.pending.push((self.seq, *event));
            self.seq += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    fn pop_due(&mut self, until: Timestamp) -> Option<ScheduledEvent> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, event))| event.at <= until)
            .min_by_key(|(_, (seq, event))| (event.order_key(), *seq))
            .map(|(index, _)| index)?;
        Some(self.pending.remove(index).1)
    }

    /// Fires every event due up to `until`, then parks the clock at `until`.
    pub fn run_until(
        &mut self,
        engine: &mut CombatEngine,
        until: Timestamp,
        env: &SimEnv<'_>,
    ) -> Vec<EventReport> {
        let mut reports = Vec::new();
        while let Some(event) = self.pop_due(until) {
            engine.advance_to(event.at).unwrap();
            let report = engine.fire_event(event.event, env).unwrap();
            self.push_all(report.scheduled_events());
            reports.push(report);
        }
        if until > engine.now() {
            engine.advance_to(until).unwrap();
        }
        reports
    }
}

pub fn damage_of(reports: &[EventReport]) -> Vec<DamageRecord> {
    reports
        .iter()
        .flat_map(|report| report.damage_records().cloned())
        .collect()
}

pub fn build(builder: SpellBuilder) -> SpellConfig {
    builder
        .build(&Loadout::new(), &SimConfig::default())
        .unwrap()
}

pub fn rogue(energy: f64, points: u8) -> UnitState {
    UnitState::new(
        ROGUE,
        ResourcePools::empty()
            .with_pool(ContinuousPool::with_current(ResourceKind::Energy, energy, 100.0))
            .with_combo_points(points),
    )
}

/// Engine with the rogue, a boss and an add, and `spells` registered.
pub fn engine(rogue: UnitState, spells: Vec<SpellConfig>) -> CombatEngine {
    let mut engine = CombatEngine::new(SimConfig::with_seed(7));
    engine.add_unit(rogue);
    engine.add_unit(UnitState::target(BOSS));
    engine.add_unit(UnitState::target(ADD));
    for spell in spells {
        engine.register_spell(spell).unwrap();
    }
    engine.validate_spells().unwrap();
    engine
}

pub fn energy(engine: &CombatEngine) -> f64 {
    engine
        .unit(ROGUE)
        .unwrap()
        .pools
        .amount(ResourceKind::Energy)
        .unwrap()
}

pub fn combo_points(engine: &CombatEngine) -> u8 {
    engine.unit(ROGUE).unwrap().pools.combo_points().current()
}

pub fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
