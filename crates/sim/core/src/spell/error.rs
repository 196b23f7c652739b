//! Spell configuration, cast, and effect errors.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, SimError};
use crate::state::{ActionId, Timestamp, UnitId};
use crate::stats::{ResourceError, ResourceKind};

/// Misconfiguration caught while building spells. Never raised mid-simulation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("talent {talent} rank {rank} has no entry in a {entries}-entry table")]
    RankOutOfRange {
        talent: String,
        rank: u8,
        entries: usize,
    },

    #[error("modifier {modifier} resolved to invalid factor {factor}")]
    InvalidFactor { modifier: String, factor: f64 },

    #[error("point table needs {expected} entries, got {actual}")]
    PointTableSize { expected: usize, actual: usize },

    #[error("{points} points exceeds the maximum of {max}")]
    PointsOutOfRange { points: u8, max: u8 },

    #[error("tick formula yields {ticks} ticks at {points} points")]
    InvalidTickCount { points: u8, ticks: i64 },

    #[error("{spell} has a zero tick interval")]
    ZeroTickInterval { spell: ActionId },

    #[error("{spell} has an empty composite effect")]
    EmptyComposite { spell: ActionId },

    #[error("damage range {min}..{max} is invalid")]
    InvalidDamageRange { min: f64, max: f64 },

    #[error("{spell} has invalid cost {amount}")]
    InvalidCost { spell: ActionId, amount: f64 },

    #[error("{0} has no effect configured")]
    MissingEffect(ActionId),

    #[error("{0} is already registered")]
    DuplicateSpell(ActionId),

    #[error("{spell} references unregistered {missing}")]
    UnknownReference { spell: ActionId, missing: ActionId },
}

impl SimError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ConfigError::*;
        match self {
            RankOutOfRange { .. } => "CONFIG_RANK_OUT_OF_RANGE",
            InvalidFactor { .. } => "CONFIG_INVALID_FACTOR",
            PointTableSize { .. } => "CONFIG_POINT_TABLE_SIZE",
            PointsOutOfRange { .. } => "CONFIG_POINTS_OUT_OF_RANGE",
            InvalidTickCount { .. } => "CONFIG_INVALID_TICK_COUNT",
            ZeroTickInterval { .. } => "CONFIG_ZERO_TICK_INTERVAL",
            EmptyComposite { .. } => "CONFIG_EMPTY_COMPOSITE",
            InvalidDamageRange { .. } => "CONFIG_INVALID_DAMAGE_RANGE",
            InvalidCost { .. } => "CONFIG_INVALID_COST",
            MissingEffect(_) => "CONFIG_MISSING_EFFECT",
            DuplicateSpell(_) => "CONFIG_DUPLICATE_SPELL",
            UnknownReference { .. } => "CONFIG_UNKNOWN_REFERENCE",
        }
    }
}

/// Reasons a cast is rejected.
///
/// Cooldown and resource rejections happen before any state is touched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("global cooldown active until {ready_at}")]
    OnGlobalCooldown { ready_at: Timestamp },

    #[error("insufficient {kind}: need {required}, have {available}")]
    InsufficientResource {
        kind: ResourceKind,
        required: f64,
        available: f64,
    },

    #[error("caster is already casting until {resume_at}")]
    AlreadyCasting { resume_at: Timestamp },

    #[error("unknown spell {0}")]
    UnknownSpell(ActionId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("target {0} is dead or gone")]
    InvalidTarget(UnitId),

    #[error(transparent)]
    Resource(ResourceError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<ResourceError> for CastError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::Insufficient {
                kind,
                required,
                available,
            } => Self::InsufficientResource {
                kind,
                required,
                available,
            },
            other => Self::Resource(other),
        }
    }
}

impl SimError for CastError {
    fn severity(&self) -> ErrorSeverity {
        use CastError::*;
        match self {
            OnGlobalCooldown { .. } | InsufficientResource { .. } | AlreadyCasting { .. } => {
                ErrorSeverity::Recoverable
            }
            UnknownSpell(_) | UnknownUnit(_) | InvalidTarget(_) => ErrorSeverity::Validation,
            Resource(err) => err.severity(),
            Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use CastError::*;
        match self {
            OnGlobalCooldown { .. } => "CAST_ON_GLOBAL_COOLDOWN",
            InsufficientResource { .. } => "CAST_INSUFFICIENT_RESOURCE",
            AlreadyCasting { .. } => "CAST_ALREADY_CASTING",
            UnknownSpell(_) => "CAST_UNKNOWN_SPELL",
            UnknownUnit(_) => "CAST_UNKNOWN_UNIT",
            InvalidTarget(_) => "CAST_INVALID_TARGET",
            Resource(err) => err.error_code(),
            Oracle(err) => err.error_code(),
        }
    }
}

/// Failure inside an effect or side effect after the cast committed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("unknown spell {0}")]
    UnknownSpell(ActionId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("nested casts exceed depth {0}")]
    TooDeep(u8),
}

impl SimError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Resource(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
            Self::UnknownSpell(_) | Self::UnknownUnit(_) => ErrorSeverity::Validation,
            Self::TooDeep(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Resource(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
            Self::UnknownSpell(_) => "EFFECT_UNKNOWN_SPELL",
            Self::UnknownUnit(_) => "EFFECT_UNKNOWN_UNIT",
            Self::TooDeep(_) => "EFFECT_TOO_DEEP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_resource_maps_to_cast_error() {
        let err: CastError = ResourceError::Insufficient {
            kind: ResourceKind::Energy,
            required: 35.0,
            available: 10.0,
        }
        .into();
        assert_eq!(
            err,
            CastError::InsufficientResource {
                kind: ResourceKind::Energy,
                required: 35.0,
                available: 10.0,
            }
        );
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "CAST_INSUFFICIENT_RESOURCE");
    }

    #[test]
    fn missing_pool_is_not_recoverable() {
        let err: CastError = ResourceError::PoolMissing {
            kind: ResourceKind::Mana,
        }
        .into();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
