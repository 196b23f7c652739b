//! Errors surfaced by the encounter runtime.

use sim_core::{CastError, ConfigError, EngineError, ResourceKind, UnitId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid scenario: {0}")]
    Config(#[from] ConfigError),

    #[error("no stats configured for {0}")]
    MissingStats(UnitId),

    #[error("{kind} is discrete and cannot be configured as a pool")]
    DiscretePool { kind: ResourceKind },
}
