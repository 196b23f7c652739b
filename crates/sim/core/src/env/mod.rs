//! Traits describing the collaborators the core reads from.
//!
//! Stats, mitigation, the target roster and randomness all live outside the
//! core. The [`SimEnv`] aggregate bundles them so the engine can reach
//! everything it needs without coupling to concrete implementations.
mod error;
mod log;
mod mitigation;
mod rng;
mod stats;
mod targets;

pub use error::OracleError;
pub use log::{CombatLog, CombatLogEntry};
pub use mitigation::{MitigationOracle, MitigationQuery};
pub use rng::{PcgRng, RngOracle, compute_seed, roll_context};
pub use stats::StatsOracle;
pub use targets::TargetOracle;

/// Aggregates the collaborators required by the cast and tick pipelines.
#[derive(Clone, Copy)]
pub struct SimEnv<'a> {
    stats: Option<&'a dyn StatsOracle>,
    mitigation: Option<&'a dyn MitigationOracle>,
    targets: Option<&'a dyn TargetOracle>,
    rng: Option<&'a dyn RngOracle>,
    log: Option<&'a dyn CombatLog>,
}

impl<'a> SimEnv<'a> {
    pub fn new(
        stats: Option<&'a dyn StatsOracle>,
        mitigation: Option<&'a dyn MitigationOracle>,
        targets: Option<&'a dyn TargetOracle>,
        rng: Option<&'a dyn RngOracle>,
        log: Option<&'a dyn CombatLog>,
    ) -> Self {
        Self {
            stats,
            mitigation,
            targets,
            rng,
            log,
        }
    }

    pub fn with_all(
        stats: &'a dyn StatsOracle,
        mitigation: &'a dyn MitigationOracle,
        targets: &'a dyn TargetOracle,
        rng: &'a dyn RngOracle,
        log: &'a dyn CombatLog,
    ) -> Self {
        Self::new(
            Some(stats),
            Some(mitigation),
            Some(targets),
            Some(rng),
            Some(log),
        )
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None, None)
    }

    /// Returns the StatsOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::StatsNotAvailable` if no stats oracle was provided.
    pub fn stats(&self) -> Result<&'a dyn StatsOracle, OracleError> {
        self.stats.ok_or(OracleError::StatsNotAvailable)
    }

    pub fn mitigation(&self) -> Result<&'a dyn MitigationOracle, OracleError> {
        self.mitigation.ok_or(OracleError::MitigationNotAvailable)
    }

    pub fn targets(&self) -> Result<&'a dyn TargetOracle, OracleError> {
        self.targets.ok_or(OracleError::TargetsNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Records `entry` if a log is attached. Never fails.
    pub fn record(&self, entry: CombatLogEntry) {
        if let Some(log) = self.log {
            log.record(&entry);
        }
    }
}
