mod common;

use common::*;
use sim_core::{
    ActionId, AttackerStats, BaseDamage, CombatLogEntry, DefenseType, DotKey, EffectKind,
    EngineError, Outcome, PeriodicConfig, RefreshPolicy, ResourceKind, RollCategory, ScalingStat,
    SimEvent, SpellConfig, TickFormula, Timestamp,
};

const RUPTURE: ActionId = ActionId(40);

fn rupture(refresh: RefreshPolicy, can_crit: bool) -> SpellConfig {
    build(
        SpellConfig::builder(RUPTURE, "Rupture")
            .roll(RollCategory::MeleeSpecialHit)
            .defense(DefenseType::Melee)
            .effect(EffectKind::PeriodicDamage(PeriodicConfig {
                per_tick: BaseDamage::Scaled {
                    stat: ScalingStat::AttackPower,
                    coefficient: 0.1,
                },
                ticks: TickFormula::Fixed(3),
                interval_ms: 3_000,
                refresh,
                tag: None,
                can_crit,
            })),
    )
}

fn key() -> DotKey {
    DotKey {
        caster: ROGUE,
        spell: RUPTURE,
        target: BOSS,
    }
}

#[test]
fn snapshot_ignores_stat_changes_mid_effect() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, false)]);
    let mut queue = Queue::default();

    let report = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&report.scheduled);

    let first = damage_of(&queue.run_until(&mut engine, Timestamp(3_000), &env));
    fx.stats.set_attacker(
        ROGUE,
        AttackerStats {
            attack_power: 5_000.0,
            damage_multiplier: 2.0,
            ..AttackerStats::default()
        },
    );
    let rest = damage_of(&queue.run_until(&mut engine, Timestamp(20_000), &env));

    assert_eq!(first.len(), 1);
    assert_eq!(rest.len(), 2);
    for tick in first.iter().chain(&rest) {
        approx(tick.amount, 100.0);
    }
}

#[test]
fn refresh_replaces_and_stales_the_old_tick() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, false)]);
    let mut queue = Queue::default();

    let first = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&first.scheduled);
    let early = damage_of(&queue.run_until(&mut engine, Timestamp(4_000), &env));

    fx.stats
        .set_attacker(ROGUE, AttackerStats::with_attack_power(2_000.0));
    let second = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&second.scheduled);
    let reports = queue.run_until(&mut engine, Timestamp(30_000), &env);
    let late = damage_of(&reports);

    assert_eq!(engine.dots().len(), 0);
    assert_eq!(early.len(), 1);
    approx(early[0].amount, 100.0);

    // The tick queued for 6s belonged to the replaced instance.
    assert_eq!(reports.iter().filter(|report| report.stale).count(), 1);
    let at: Vec<u64> = late.iter().map(|tick| tick.at.as_millis()).collect();
    assert_eq!(at, vec![7_000, 10_000, 13_000]);
    for tick in &late {
        approx(tick.amount, 200.0);
    }
}

#[test]
fn rollover_keeps_the_frozen_damage() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Rollover, false)]);
    let mut queue = Queue::default();

    let first = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&first.scheduled);
    queue.run_until(&mut engine, Timestamp(4_000), &env);

    fx.stats
        .set_attacker(ROGUE, AttackerStats::with_attack_power(2_000.0));
    let second = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&second.scheduled);

    let instance = engine.dots().find(&key()).unwrap();
    assert_eq!(instance.remaining_ticks, 3);
    approx(instance.snapshot.per_tick, 100.0);

    let late = damage_of(&queue.run_until(&mut engine, Timestamp(30_000), &env));
    assert_eq!(late.len(), 3);
    assert!(late.iter().all(|tick| (tick.amount - 100.0).abs() < 1e-9));
}

#[test]
fn removing_a_target_cancels_its_effects() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, false)]);
    let mut queue = Queue::default();

    let report = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&report.scheduled);

    engine.advance_to(Timestamp(1_000)).unwrap();
    let cancelled = engine.remove_unit(BOSS, &env);
    assert_eq!(cancelled.len(), 1);
    assert!(engine.dots().is_empty());

    let reports = queue.run_until(&mut engine, Timestamp(30_000), &env);
    assert!(damage_of(&reports).is_empty());
    assert!(reports.iter().all(|report| report.stale));
    assert!(fx.log.entries().contains(&CombatLogEntry::DotCancelled {
        at: Timestamp(1_000),
        key: key(),
    }));
}

#[test]
fn tick_on_a_dead_target_cancels_the_instance() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, false)]);
    let mut queue = Queue::default();

    let report = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&report.scheduled);
    engine.unit_mut(BOSS).unwrap().alive = false;

    let reports = queue.run_until(&mut engine, Timestamp(30_000), &env);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].cancelled, vec![key()]);
    assert!(reports[0].damage.is_empty());
    assert!(engine.dots().is_empty());
}

#[test]
fn ticks_roll_crit_with_captured_chance() {
    let fx = Fixture::new();
    fx.stats.set_attacker(
        ROGUE,
        AttackerStats {
            attack_power: 1_000.0,
            melee_crit: 1.0,
            ..AttackerStats::default()
        },
    );
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, true)]);
    let mut queue = Queue::default();

    let report = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    queue.push_all(&report.scheduled);
    fx.stats
        .set_attacker(ROGUE, AttackerStats::with_attack_power(1_000.0));

    let ticks = damage_of(&queue.run_until(&mut engine, Timestamp(30_000), &env));
    assert_eq!(ticks.len(), 3);
    for tick in &ticks {
        assert_eq!(tick.outcome, Outcome::Crit);
        approx(tick.amount, 200.0);
    }
}

#[test]
fn early_tick_is_refused() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(100.0, 0), vec![rupture(RefreshPolicy::Replace, false)]);

    let report = engine.cast(ROGUE, RUPTURE, BOSS, &env).unwrap();
    let event = report.scheduled[0].event;

    let err = engine.fire_event(event, &env).unwrap_err();
    assert!(matches!(err, EngineError::EventNotDue { due, .. } if due == Timestamp(3_000)));
    assert_eq!(engine.dots().find(&key()).unwrap().remaining_ticks, 3);
}

#[test]
fn regeneration_is_clamped_to_the_pool() {
    let fx = Fixture::new();
    let env = fx.env();
    let mut engine = engine(rogue(90.0, 0), Vec::new());

    engine
        .fire_event(
            SimEvent::ResourceRegen {
                unit: ROGUE,
                kind: ResourceKind::Energy,
                amount: 20.0,
            },
            &env,
        )
        .unwrap();

    approx(energy(&engine), 100.0);
    assert_eq!(
        fx.log.entries(),
        vec![CombatLogEntry::ResourceChanged {
            at: Timestamp::ZERO,
            unit: ROGUE,
            kind: ResourceKind::Energy,
            delta: 10.0,
        }]
    );
}

#[test]
fn time_cannot_move_backwards() {
    let mut engine = engine(rogue(100.0, 0), Vec::new());
    engine.advance_to(Timestamp(5_000)).unwrap();
    assert_eq!(
        engine.advance_to(Timestamp(4_000)),
        Err(EngineError::TimeRegression {
            now: Timestamp(5_000),
            requested: Timestamp(4_000),
        })
    );
}
