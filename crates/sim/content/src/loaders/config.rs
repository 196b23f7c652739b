//! Simulation configuration loader.

use std::path::Path;

use sim_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SimConfig`] from TOML files. Missing keys keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing SimConfig
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
