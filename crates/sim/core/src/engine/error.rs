//! Errors raised while driving the engine's timeline.

use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, SimError};
use crate::spell::CastError;
use crate::state::{Timestamp, UnitId};
use crate::stats::ResourceError;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The scheduler asked to move time backwards.
    #[error("cannot move time from {now} back to {requested}")]
    TimeRegression { now: Timestamp, requested: Timestamp },

    /// The scheduler fired an event before its due time.
    #[error("event due at {due} fired early")]
    EventNotDue { due: Timestamp, context: ErrorContext },

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl SimError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TimeRegression { .. } | Self::EventNotDue { .. } => ErrorSeverity::Internal,
            Self::UnknownUnit(_) => ErrorSeverity::Validation,
            Self::Cast(err) => err.severity(),
            Self::Resource(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::EventNotDue { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TimeRegression { .. } => "ENGINE_TIME_REGRESSION",
            Self::EventNotDue { .. } => "ENGINE_EVENT_NOT_DUE",
            Self::UnknownUnit(_) => "ENGINE_UNKNOWN_UNIT",
            Self::Cast(err) => err.error_code(),
            Self::Resource(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}
