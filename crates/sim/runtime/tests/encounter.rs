use std::path::Path;
use std::sync::Arc;

use sim_content::{ClassPreset, ContentFactory, LoadoutLoader, ScenarioLoader, SpellLoader};
use sim_core::{
    ActionId, CombatLogEntry, DamageRecord, DotKey, Loadout, ResourceKind, SimConfig, Spellbook,
    Timestamp, UnitId,
};
use sim_runtime::{Encounter, RecordingLog, Rotation, RuntimeError};

const ROGUE: UnitId = UnitId(1);
const WARLOCK: UnitId = UnitId(2);
const BOSS: UnitId = UnitId(100);
const ADD: UnitId = UnitId(101);

const SINISTER_STRIKE: ActionId = ActionId(1752);
const EVISCERATE: ActionId = ActionId(31016);
const CRIMSON_TEMPEST: ActionId = ActionId(412096);
const CRIMSON_TEMPEST_BLEED: ActionId = ActionId(412097);
const IMMOLATE: ActionId = ActionId(47811);
const INCINERATE: ActionId = ActionId(47838);

/// No avoidance and no crit chance, so every roll lands as a plain hit.
const ROGUE_SCENARIO: &str = r#"
    name = "bleed_two_targets"
    duration_ms = 20000

    [caster]
    id = 1
    class = "rogue"

    [caster.stats]
    attack_power = 1000.0

    [[caster.pools]]
    kind = "Energy"
    max = 100.0

    [[caster.regen]]
    kind = "Energy"
    amount = 50.0
    interval_ms = 1000

    [[targets]]
    id = 100

    [[targets]]
    id = 101
    dies_at_ms = 9000

    [[rotation]]
    spell = 412096
    min_points = 4
    keep_dot_up = 412097

    [[rotation]]
    spell = 1752
"#;

const WARLOCK_SCENARIO: &str = r#"
    name = "immolate_then_incinerate"

    [caster]
    id = 2
    class = "warlock"

    [caster.stats]
    spell_power = 500.0
    base_mana = 1000.0

    [[caster.pools]]
    kind = "Mana"
    max = 5000.0

    [[targets]]
    id = 100

    [[rotation]]
    spell = 47811
    keep_dot_up = 47811

    [[rotation]]
    spell = 47838
"#;

fn spellbook(preset: ClassPreset, loadout: &Loadout) -> Spellbook {
    let defs = SpellLoader::parse(preset.spells_ron()).unwrap();
    SpellLoader::build_spellbook(&defs, loadout, &SimConfig::default()).unwrap()
}

fn encounter(scenario: &str, book: Spellbook, log: Arc<RecordingLog>) -> (Encounter, Rotation) {
    let scenario = ScenarioLoader::parse(scenario).unwrap();
    let encounter =
        Encounter::from_scenario(&scenario, book, SimConfig::with_seed(3), Box::new(log)).unwrap();
    (encounter, Rotation::new(scenario.rotation))
}

fn rogue_encounter(log: Arc<RecordingLog>) -> (Encounter, Rotation) {
    let loadout = LoadoutLoader::parse(ClassPreset::Rogue.loadout_toml()).unwrap();
    encounter(ROGUE_SCENARIO, spellbook(ClassPreset::Rogue, &loadout), log)
}

fn damage(log: &RecordingLog) -> Vec<DamageRecord> {
    log.entries()
        .into_iter()
        .filter_map(|entry| match entry {
            CombatLogEntry::Damage(record) => Some(record),
            _ => None,
        })
        .collect()
}

fn started(log: &RecordingLog) -> Vec<ActionId> {
    log.entries()
        .into_iter()
        .filter_map(|entry| match entry {
            CombatLogEntry::CastStarted { spell, .. } => Some(spell),
            _ => None,
        })
        .collect()
}

#[test]
fn crimson_tempest_bleeds_every_enemy_until_it_dies() {
    let log = Arc::new(RecordingLog::new());
    let (mut encounter, rotation) = rogue_encounter(log.clone());

    encounter
        .run_rotation(ROGUE, &rotation, Timestamp(20_000))
        .unwrap();

    let summary = encounter.summary();
    assert_eq!(summary.spell(CRIMSON_TEMPEST).unwrap().casts, 2);
    assert_eq!(summary.spell(SINISTER_STRIKE).unwrap().casts, 18);
    // Add: ticks at 6 s and 8 s, then it dies. Boss: 5 ticks, then 3 of 6.
    assert_eq!(summary.spell(CRIMSON_TEMPEST_BLEED).unwrap().ticks, 10);
    assert!((summary.damage_to(ADD) - 2.0 * 975.0).abs() < 1e-6);

    let boss_ticks: Vec<f64> = damage(&log)
        .iter()
        .filter(|record| record.periodic && record.target == BOSS)
        .map(|record| record.amount)
        .collect();
    assert_eq!(boss_ticks.len(), 8);
    assert!(boss_ticks[..5].iter().all(|amount| (amount - 975.0).abs() < 1e-6));
    assert!(boss_ticks[5..].iter().all(|amount| (amount - 1_170.0).abs() < 1e-6));

    assert!(!encounter.engine().unit(ADD).unwrap().alive);
    assert!(!encounter.engine().dots().is_active(&DotKey {
        caster: ROGUE,
        spell: CRIMSON_TEMPEST_BLEED,
        target: ADD,
    }));
    assert!(damage(&log)
        .iter()
        .all(|record| record.target != ADD || record.at < Timestamp(9_000)));
}

#[test]
fn incinerate_follows_immolate() {
    let log = Arc::new(RecordingLog::new());
    let (mut encounter, rotation) = encounter(
        WARLOCK_SCENARIO,
        spellbook(ClassPreset::Warlock, &Loadout::new()),
        log.clone(),
    );

    encounter
        .run_rotation(WARLOCK, &rotation, Timestamp(10_000))
        .unwrap();

    assert_eq!(
        started(&log),
        vec![IMMOLATE, INCINERATE, INCINERATE, INCINERATE, INCINERATE]
    );
    let incinerates: Vec<DamageRecord> = damage(&log)
        .into_iter()
        .filter(|record| record.spell == INCINERATE)
        .collect();
    assert_eq!(incinerates.len(), 3);
    // Without the bonus the range tops out at 676 + 0.713 * 500.
    let floor = 582.0 + 0.713 * 500.0 + 157.0;
    assert!(incinerates.iter().all(|record| record.amount >= floor - 1e-6));
}

#[test]
fn regeneration_rearms_and_caps() {
    let scenario = ROGUE_SCENARIO.replace(
        "max = 100.0",
        "max = 100.0\n    current = 0.0",
    );
    let (mut encounter, _) = encounter(
        &scenario,
        spellbook(ClassPreset::Rogue, &Loadout::new()),
        Arc::new(RecordingLog::new()),
    );
    let energy = |encounter: &Encounter| {
        encounter
            .engine()
            .unit(ROGUE)
            .unwrap()
            .pools
            .amount(ResourceKind::Energy)
            .unwrap()
    };

    encounter.run_until(Timestamp(1_500)).unwrap();
    assert_eq!(energy(&encounter), 50.0);
    encounter.run_until(Timestamp(5_000)).unwrap();
    assert_eq!(energy(&encounter), 100.0);
    assert_eq!(encounter.pending_events(), 1);
}

#[test]
fn shipped_scenario_replays_identically() {
    let factory = ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../content/data"));
    let run = || {
        let scenario = factory.load_scenario("rogue_tempest").unwrap();
        let loadout = factory.load_loadout(scenario.caster.loadout_name()).unwrap();
        let config = factory.load_config().unwrap();
        let book = factory
            .load_spellbook(&scenario.caster.class, &loadout, &config)
            .unwrap();
        let log = Arc::new(RecordingLog::new());
        let mut encounter =
            Encounter::from_scenario(&scenario, book, config, Box::new(log.clone())).unwrap();
        encounter
            .run_rotation(
                scenario.caster.unit_id(),
                &Rotation::new(scenario.rotation.clone()),
                Timestamp(scenario.duration_ms),
            )
            .unwrap();
        (log.entries(), encounter.summary().total_damage())
    };

    let (first_log, first_total) = run();
    let (second_log, second_total) = run();
    assert!(first_total > 0.0);
    assert_eq!(first_total, second_total);
    assert_eq!(first_log, second_log);
}

#[test]
fn opener_is_only_picked_while_stealthed() {
    let scenario = ROGUE_SCENARIO
        .replace("class = \"rogue\"", "class = \"rogue\"\n    stealthed = true")
        .replacen(
            "[[rotation]]",
            "[[rotation]]\n    spell = 31016\n    requires_stealth = true\n\n    [[rotation]]",
            1,
        );
    let loadout = LoadoutLoader::parse(ClassPreset::Rogue.loadout_toml()).unwrap();
    let (mut encounter, rotation) = encounter(
        &scenario,
        spellbook(ClassPreset::Rogue, &loadout),
        Arc::new(RecordingLog::new()),
    );

    assert_eq!(rotation.next(&encounter, ROGUE, BOSS), Some(EVISCERATE));
    encounter.cast(ROGUE, EVISCERATE, BOSS).unwrap();

    assert!(!encounter.engine().unit(ROGUE).unwrap().stealthed);
    assert_eq!(rotation.next(&encounter, ROGUE, BOSS), Some(SINISTER_STRIKE));
}

#[test]
fn combo_points_cannot_be_a_pool() {
    let scenario = ROGUE_SCENARIO.replace("kind = \"Energy\"\n    max", "kind = \"ComboPoints\"\n    max");
    let scenario = ScenarioLoader::parse(&scenario).unwrap();
    let result = Encounter::from_scenario(
        &scenario,
        Spellbook::new(),
        SimConfig::default(),
        Box::new(RecordingLog::new()),
    );
    assert!(matches!(
        result,
        Err(RuntimeError::DiscretePool {
            kind: ResourceKind::ComboPoints
        })
    ));
}
