use std::fs;
use std::path::{Path, PathBuf};

use sim_content::{ContentFactory, SpellLoader};
use sim_core::{ActionId, EffectKind, Loadout, ResourceKind, SimConfig};

fn shipped() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn shipped_scenarios_reference_known_spells() {
    let factory = shipped();
    let config = factory.load_config().unwrap();

    for name in ["rogue_tempest", "warlock_fire"] {
        let scenario = factory.load_scenario(name).unwrap();
        let loadout = factory.load_loadout(scenario.caster.loadout_name()).unwrap();
        let book = factory
            .load_spellbook(&scenario.caster.class, &loadout, &config)
            .unwrap();

        for step in &scenario.rotation {
            assert!(book.contains(step.action_id()), "{name}: {}", step.spell);
            if let Some(dot) = step.keep_dot_up {
                assert!(book.contains(ActionId(dot)), "{name}: dot {dot}");
            }
        }
    }
}

#[test]
fn shipped_config_sets_seed() {
    let config = shipped().load_config().unwrap();
    assert_eq!(config.seed, 20_241_016);
    assert_eq!(config.min_gcd_ms, SimConfig::DEFAULT_MIN_GCD_MS);
}

#[test]
fn life_tap_generates_mana() {
    let factory = shipped();
    let book = factory
        .load_spellbook("warlock", &Loadout::new(), &SimConfig::default())
        .unwrap();
    let life_tap = book.get(ActionId(1454)).unwrap();
    assert_eq!(
        life_tap.effect,
        EffectKind::ResourceGenerator {
            kind: ResourceKind::Mana,
            amount: 580.0,
        }
    );
    assert!(life_tap.cost.is_none());
}

#[test]
fn data_dir_overrides_embedded_spells() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "spells/rogue.ron",
        r#"[(
            id: 9,
            name: "Poke",
            cost: Some((kind: Energy, flat: 10.0)),
            effect: DirectDamage(Fixed(5.0)),
        )]"#,
    );
    write(dir.path(), "loadouts/rogue.toml", "");

    let factory = ContentFactory::new(dir.path());
    let loadout = factory.load_loadout("rogue").unwrap();
    let book = factory
        .load_spellbook("rogue", &loadout, &SimConfig::default())
        .unwrap();

    assert_eq!(book.len(), 1);
    let poke = book.get(ActionId(9)).unwrap();
    assert_eq!(poke.cost.as_ref().unwrap().kind, ResourceKind::Energy);
    assert_eq!(poke.timing.gcd_ms, SimConfig::DEFAULT_GCD_MS);
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());

    let err = factory.load_scenario("nowhere").unwrap_err();
    assert!(err.to_string().contains("nowhere.toml"));
    assert!(factory.load_config().is_err());
}

#[test]
fn malformed_spell_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "spells/broken.ron", "[(id: 1,]");
    let err = SpellLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("broken.ron"));
}
