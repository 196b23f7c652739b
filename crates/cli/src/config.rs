//! Command line configuration, read from the environment.
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Content root holding `config.toml`, `spells/`, `loadouts/` and `scenarios/`.
    pub data_dir: PathBuf,
    pub scenario: String,
    /// Overrides the seed from `config.toml`.
    pub seed: Option<u64>,
    /// Overrides the scenario's duration.
    pub duration_ms: Option<u64>,
    /// Prints every combat log entry through tracing.
    pub combat_log: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/sim/content/data"),
            scenario: "rogue_tempest".to_string(),
            seed: None,
            duration_ms: None,
            combat_log: false,
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SIM_DATA_DIR` - Content directory (default: `crates/sim/content/data`)
    /// - `SIM_SCENARIO` - Scenario name under `scenarios/` (default: `rogue_tempest`)
    /// - `SIM_SEED` - Seed override
    /// - `SIM_DURATION_MS` - Duration override in milliseconds
    /// - `SIM_COMBAT_LOG` - Print the combat log (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("SIM_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(scenario) = read_env::<String>("SIM_SCENARIO") {
            config.scenario = scenario;
        }
        config.seed = read_env("SIM_SEED");
        config.duration_ms = read_env("SIM_DURATION_MS");
        if let Some(show) = read_env_bool("SIM_COMBAT_LOG") {
            config.combat_log = show;
        }

        config
    }

    /// A positional argument names the scenario, overriding `SIM_SCENARIO`.
    #[must_use]
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(scenario) = args.next() {
            self.scenario = scenario;
        }
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_argument_names_scenario() {
        let config = CliConfig::default().with_args(vec!["warlock_fire".to_string()].into_iter());
        assert_eq!(config.scenario, "warlock_fire");
        let config = CliConfig::default().with_args(std::iter::empty());
        assert_eq!(config.scenario, "rogue_tempest");
    }
}
