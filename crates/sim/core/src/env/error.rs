//! Oracle access errors.

use crate::error::{ErrorSeverity, SimError};
use crate::state::UnitId;

/// Errors that occur when the engine reaches for an external collaborator.
///
/// A missing oracle is fatal: the engine cannot roll or scale damage without
/// one. A unit the stats oracle does not know is a validation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("StatsOracle not available")]
    StatsNotAvailable,

    #[error("MitigationOracle not available")]
    MitigationNotAvailable,

    #[error("TargetOracle not available")]
    TargetsNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("no stats for unit {0}")]
    UnitStatsNotFound(UnitId),
}

impl SimError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            StatsNotAvailable | MitigationNotAvailable | TargetsNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }
            UnitStatsNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            StatsNotAvailable => "ORACLE_STATS_NOT_AVAILABLE",
            MitigationNotAvailable => "ORACLE_MITIGATION_NOT_AVAILABLE",
            TargetsNotAvailable => "ORACLE_TARGETS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            UnitStatsNotFound(_) => "ORACLE_UNIT_STATS_NOT_FOUND",
        }
    }
}
