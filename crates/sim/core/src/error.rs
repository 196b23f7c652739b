//! Common error infrastructure for sim-core.
//!
//! Domain-specific errors (`CastError`, `ResourceError`, `ConfigError`, ...)
//! live next to the code that raises them. This module provides the shared
//! classification every one of them implements.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error enum with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **No Unwinding**: Cast rejections are values handed back to the caller

use crate::state::{ActionId, Timestamp, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The caller may retry later or pick another spell
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Missing collaborators or corrupted state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative spell.
    ///
    /// Examples: global cooldown still running, not enough energy
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown spell, point table of the wrong size
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - simulation cannot continue.
    ///
    /// Examples: missing stats oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Unit that triggered the error (if applicable).
    pub unit: Option<UnitId>,

    /// Spell being cast or ticked (if applicable).
    pub spell: Option<ActionId>,

    /// Simulated time at which the error occurred.
    pub at: Timestamp,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context at the given time.
    #[must_use]
    pub const fn new(at: Timestamp) -> Self {
        Self {
            unit: None,
            spell: None,
            at,
            message: None,
        }
    }

    /// Attaches a unit to this context (builder pattern).
    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Attaches a spell to this context (builder pattern).
    #[must_use]
    pub const fn with_spell(mut self, spell: ActionId) -> Self {
        self.spell = Some(spell);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all sim-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SimError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a stable, machine-readable code for logs and metrics.
    fn error_code(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }

    #[test]
    fn context_builder_attaches_fields() {
        let ctx = ErrorContext::new(Timestamp(1_500))
            .with_unit(UnitId(3))
            .with_spell(ActionId(412096))
            .with_message("cast rejected");

        assert_eq!(ctx.unit, Some(UnitId(3)));
        assert_eq!(ctx.spell, Some(ActionId(412096)));
        assert_eq!(ctx.at, Timestamp(1_500));
        assert_eq!(ctx.message, Some("cast rejected"));
    }
}
