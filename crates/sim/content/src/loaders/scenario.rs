//! Encounter scenario loader.
//!
//! A scenario names one caster, its targets and a priority rotation. The
//! runtime turns it into oracles, units and a scheduler; nothing here touches
//! encounter state.

use std::path::Path;

use serde::Deserialize;
use sim_core::{ActionId, AttackerStats, DefenderStats, ResourceKind, UnitId};

use crate::loaders::{LoadResult, read_file};

fn default_duration_ms() -> u64 {
    60_000
}

fn default_caster_id() -> u32 {
    1
}

/// Caster resource pool. `current` defaults to `max`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PoolDef {
    pub kind: ResourceKind,
    pub max: f64,
    #[serde(default)]
    pub current: Option<f64>,
}

/// Periodic regeneration of one continuous pool.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RegenDef {
    pub kind: ResourceKind,
    pub amount: f64,
    pub interval_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CasterDef {
    #[serde(default = "default_caster_id")]
    pub id: u32,
    /// Class preset whose spells the caster knows.
    pub class: String,
    /// Loadout file under `loadouts/`; defaults to the class name.
    #[serde(default)]
    pub loadout: Option<String>,
    #[serde(default)]
    pub stats: AttackerStats,
    #[serde(default)]
    pub pools: Vec<PoolDef>,
    #[serde(default)]
    pub combo_points: u8,
    #[serde(default)]
    pub stealthed: bool,
    #[serde(default)]
    pub regen: Vec<RegenDef>,
}

impl CasterDef {
    pub fn unit_id(&self) -> UnitId {
        UnitId(self.id)
    }

    pub fn loadout_name(&self) -> &str {
        self.loadout.as_deref().unwrap_or(&self.class)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TargetDef {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub defender: DefenderStats,
    #[serde(default)]
    pub armor: f64,
    /// The target is removed from the encounter at this time.
    #[serde(default)]
    pub dies_at_ms: Option<u64>,
}

impl TargetDef {
    pub fn unit_id(&self) -> UnitId {
        UnitId(self.id)
    }
}

/// One rotation priority. The first step whose conditions hold is cast.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RotationStep {
    pub spell: u32,
    /// Cast only with at least this many combo points.
    #[serde(default)]
    pub min_points: u8,
    /// Skip while the caster's periodic effect from this spell ticks on the
    /// primary target.
    #[serde(default)]
    pub keep_dot_up: Option<u32>,
    /// Opener: cast only while the caster is still stealthed.
    #[serde(default)]
    pub requires_stealth: bool,
}

impl RotationStep {
    pub fn action_id(&self) -> ActionId {
        ActionId(self.spell)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScenarioDef {
    pub name: String,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    pub caster: CasterDef,
    pub targets: Vec<TargetDef>,
    pub rotation: Vec<RotationStep>,
}

impl ScenarioDef {
    /// First target in the file; rotation casts land on it.
    pub fn primary_target(&self) -> Option<UnitId> {
        self.targets.first().map(TargetDef::unit_id)
    }

    fn check(self) -> LoadResult<Self> {
        if self.targets.is_empty() {
            anyhow::bail!("Scenario {} has no targets", self.name);
        }
        if self.rotation.is_empty() {
            anyhow::bail!("Scenario {} has an empty rotation", self.name);
        }
        if let Some(target) = self.targets.iter().find(|t| t.id == self.caster.id) {
            anyhow::bail!(
                "Scenario {} reuses unit id {} for caster and target",
                self.name,
                target.id
            );
        }
        if let Some(regen) = self.caster.regen.iter().find(|r| r.interval_ms == 0) {
            anyhow::bail!(
                "Scenario {} regenerates {} with a zero interval",
                self.name,
                regen.kind
            );
        }
        Ok(self)
    }
}

/// Loader for [`ScenarioDef`] from TOML files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioDef> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load scenario {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioDef> {
        let scenario: ScenarioDef = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario TOML: {}", e))?;
        scenario.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        name = "dummy"

        [caster]
        class = "rogue"

        [[targets]]
        id = 100

        [[rotation]]
        spell = 1752
    "#;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        assert_eq!(scenario.duration_ms, 60_000);
        assert_eq!(scenario.caster.unit_id(), UnitId(1));
        assert_eq!(scenario.caster.loadout_name(), "rogue");
        assert_eq!(scenario.caster.stats, AttackerStats::default());
        assert_eq!(scenario.primary_target(), Some(UnitId(100)));
        assert_eq!(scenario.rotation[0].min_points, 0);
    }

    #[test]
    fn caster_and_target_ids_must_differ() {
        let content = MINIMAL.replace("id = 100", "id = 1");
        let err = ScenarioLoader::parse(&content).unwrap_err();
        assert!(err.to_string().contains("reuses unit id 1"));
    }

    #[test]
    fn empty_rotation_is_rejected() {
        let content = r#"
            name = "idle"
            rotation = []

            [caster]
            class = "rogue"

            [[targets]]
            id = 100
        "#;
        assert!(ScenarioLoader::parse(content).is_err());
    }
}
