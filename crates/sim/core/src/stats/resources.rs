//! Resource pools owned by a unit.
//!
//! Two pool shapes exist:
//! - Continuous pools (mana, energy, rage): `f64` capped at a maximum
//! - The discrete pool (combo points): integer in `[0, MAX_COMBO_POINTS]`
//!
//! Pools never regenerate on their own. Regeneration arrives as an external
//! event that calls [`ResourcePools::add`], the same entry point spells use.

use crate::config::SimConfig;
use crate::error::{ErrorSeverity, SimError};

// ============================================================================
// Resource Kind
// ============================================================================

/// Enum representing individual resource types.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Mana,
    Energy,
    Rage,
    /// Discrete points built by generators and spent by finishers.
    ComboPoints,
}

impl ResourceKind {
    pub const fn is_discrete(self) -> bool {
        matches!(self, Self::ComboPoints)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceError {
    #[error("insufficient {kind}: need {required}, have {available}")]
    Insufficient {
        kind: ResourceKind,
        required: f64,
        available: f64,
    },

    #[error("unit has no {kind} pool")]
    PoolMissing { kind: ResourceKind },

    #[error("invalid {kind} amount {amount}")]
    InvalidAmount { kind: ResourceKind, amount: f64 },
}

impl SimError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Insufficient { .. } => ErrorSeverity::Recoverable,
            Self::PoolMissing { .. } | Self::InvalidAmount { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Insufficient { .. } => "RESOURCE_INSUFFICIENT",
            Self::PoolMissing { .. } => "RESOURCE_POOL_MISSING",
            Self::InvalidAmount { .. } => "RESOURCE_INVALID_AMOUNT",
        }
    }
}

// ============================================================================
// Continuous Pool
// ============================================================================

/// Float pool with a cap, e.g. mana or energy.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinuousPool {
    kind: ResourceKind,
    current: f64,
    max: f64,
}

impl ContinuousPool {
    /// Creates a full pool.
    pub fn full(kind: ResourceKind, max: f64) -> Self {
        Self::with_current(kind, max, max)
    }

    /// Creates a pool at `current`, clamped into `[0, max]`.
    pub fn with_current(kind: ResourceKind, current: f64, max: f64) -> Self {
        let max = max.max(0.0);
        Self {
            kind,
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.current >= amount
    }

    /// Deducts `amount`, or fails leaving the pool untouched.
    pub fn charge(&mut self, amount: f64) -> Result<(), ResourceError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ResourceError::InvalidAmount {
                kind: self.kind,
                amount,
            });
        }
        if !self.can_afford(amount) {
            return Err(ResourceError::Insufficient {
                kind: self.kind,
                required: amount,
                available: self.current,
            });
        }
        self.current -= amount;
        Ok(())
    }

    /// Adds `amount` (which may be negative) clamped to `[0, max]`.
    ///
    /// Returns the change actually applied.
    pub fn add(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max);
        self.current - before
    }
}

// ============================================================================
// Discrete Pool
// ============================================================================

/// Bounded integer pool, e.g. combo points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscretePool {
    current: u8,
    max: u8,
}

impl DiscretePool {
    pub fn new(max: u8) -> Self {
        Self { current: 0, max }
    }

    pub fn combo_points() -> Self {
        Self::new(SimConfig::MAX_COMBO_POINTS)
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn charge(&mut self, amount: u8) -> Result<(), ResourceError> {
        if self.current < amount {
            return Err(ResourceError::Insufficient {
                kind: ResourceKind::ComboPoints,
                required: f64::from(amount),
                available: f64::from(self.current),
            });
        }
        self.current -= amount;
        Ok(())
    }

    /// Adds `amount` (which may be negative) clamped to `[0, max]`.
    ///
    /// Returns the change actually applied.
    pub fn add(&mut self, amount: i32) -> i32 {
        let before = i32::from(self.current);
        let after = (before + amount).clamp(0, i32::from(self.max));
        // after is within [0, max] so it fits in u8
        self.current = after as u8;
        after - before
    }

    /// Returns the value held before zeroing the pool.
    pub fn read_and_reset(&mut self) -> u8 {
        std::mem::take(&mut self.current)
    }
}

impl Default for DiscretePool {
    fn default() -> Self {
        Self::combo_points()
    }
}

// ============================================================================
// Pools owned by one unit
// ============================================================================

/// All resource pools of one unit.
///
/// Continuous pools are optional: a warlock has mana but no energy. Every unit
/// carries a discrete pool, which simply stays at zero for classes without
/// finishers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePools {
    continuous: Vec<ContinuousPool>,
    combo_points: DiscretePool,
}

impl ResourcePools {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a continuous pool (builder pattern).
    #[must_use]
    pub fn with_pool(mut self, pool: ContinuousPool) -> Self {
        self.continuous.retain(|existing| existing.kind != pool.kind);
        self.continuous.push(pool);
        self
    }

    #[must_use]
    pub fn with_combo_points(mut self, current: u8) -> Self {
        self.combo_points.add(i32::from(current));
        self
    }

    pub fn continuous(&self, kind: ResourceKind) -> Option<&ContinuousPool> {
        self.continuous.iter().find(|pool| pool.kind == kind)
    }

    fn continuous_mut(&mut self, kind: ResourceKind) -> Result<&mut ContinuousPool, ResourceError> {
        self.continuous
            .iter_mut()
            .find(|pool| pool.kind == kind)
            .ok_or(ResourceError::PoolMissing { kind })
    }

    pub fn combo_points(&self) -> &DiscretePool {
        &self.combo_points
    }

    pub fn combo_points_mut(&mut self) -> &mut DiscretePool {
        &mut self.combo_points
    }

    /// Current amount of `kind`, or `None` if the unit has no such pool.
    pub fn amount(&self, kind: ResourceKind) -> Option<f64> {
        if kind.is_discrete() {
            return Some(f64::from(self.combo_points.current()));
        }
        self.continuous(kind).map(ContinuousPool::current)
    }

    /// Charges `amount` of `kind`. Fails without mutating anything.
    pub fn charge(&mut self, kind: ResourceKind, amount: f64) -> Result<(), ResourceError> {
        if kind.is_discrete() {
            if !amount.is_finite() || amount < 0.0 || amount > f64::from(u8::MAX) {
                return Err(ResourceError::InvalidAmount { kind, amount });
            }
            return self.combo_points.charge(amount.ceil() as u8);
        }
        self.continuous_mut(kind)?.charge(amount)
    }

    /// Adds `amount` of `kind`, clamped to the pool bounds.
    ///
    /// Returns the change actually applied.
    pub fn add(&mut self, kind: ResourceKind, amount: f64) -> Result<f64, ResourceError> {
        if !amount.is_finite() {
            return Err(ResourceError::InvalidAmount { kind, amount });
        }
        if kind.is_discrete() {
            return Ok(f64::from(self.combo_points.add(amount.round() as i32)));
        }
        Ok(self.continuous_mut(kind)?.add(amount))
    }
}
