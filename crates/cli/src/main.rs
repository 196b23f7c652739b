//! Runs one combat scenario and prints the damage breakdown.
//!
//! ```bash
//! SIM_SEED=7 cargo run -p sim-cli -- warlock_fire
//! SIM_COMBAT_LOG=1 RUST_LOG=combat_log=debug cargo run -p sim-cli
//! ```
mod config;
mod report;

use anyhow::Result;
use sim_content::ContentFactory;
use sim_core::Timestamp;
use sim_runtime::{Encounter, Rotation, TracingCombatLog};

use crate::config::CliConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::from_env().with_args(std::env::args().skip(1));

    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    if !config.combat_log {
        let quiet: tracing_subscriber::filter::Directive = "combat_log=off".parse()?;
        filter = filter.add_directive(quiet);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let factory = ContentFactory::new(&config.data_dir);
    let mut sim_config = factory.load_config()?;
    if let Some(seed) = config.seed {
        sim_config.seed = seed;
    }

    let scenario = factory.load_scenario(&config.scenario)?;
    let loadout = factory.load_loadout(scenario.caster.loadout_name())?;
    let spells = factory.load_spellbook(&scenario.caster.class, &loadout, &sim_config)?;
    let duration_ms = config.duration_ms.unwrap_or(scenario.duration_ms);

    tracing::info!(
        "Running {} for {} ms with seed {}",
        scenario.name,
        duration_ms,
        sim_config.seed
    );

    let mut encounter =
        Encounter::from_scenario(&scenario, spells, sim_config, Box::new(TracingCombatLog))?;
    encounter.run_rotation(
        scenario.caster.unit_id(),
        &Rotation::new(scenario.rotation.clone()),
        Timestamp(duration_ms),
    )?;

    print!(
        "{}",
        report::render(encounter.summary(), encounter.engine().spells(), duration_ms)
    );
    Ok(())
}
