//! Finisher policy: combo point scaling and consumption.
//!
//! A finisher observes the caster's combo points when the cast starts, scales
//! its tick count and damage from that value through tables that define every
//! point count including zero, and empties the pool once the cast lands. A
//! finisher at zero points still fires with its zero-point entry.

use arrayvec::ArrayVec;

use crate::config::SimConfig;
use crate::spell::ConfigError;
use crate::stats::ResourcePools;

/// Combo point count in `[0, SimConfig::MAX_COMBO_POINTS]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Points(u8);

impl Points {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(SimConfig::MAX_COMBO_POINTS);

    pub fn new(points: u8) -> Result<Self, ConfigError> {
        if points > SimConfig::MAX_COMBO_POINTS {
            return Err(ConfigError::PointsOutOfRange {
                points,
                max: SimConfig::MAX_COMBO_POINTS,
            });
        }
        Ok(Self(points))
    }

    /// Clamps into range; used when reading a pool that is bounded already.
    pub fn saturating(points: u8) -> Self {
        Self(points.min(SimConfig::MAX_COMBO_POINTS))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every valid point count, zero first.
    pub fn all() -> impl Iterator<Item = Points> {
        (0..=SimConfig::MAX_COMBO_POINTS).map(Points)
    }
}

impl TryFrom<u8> for Points {
    type Error = ConfigError;

    fn try_from(points: u8) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

/// Value per combo point count, with an explicit entry for every count.
#[derive(Clone, Debug, PartialEq)]
pub struct PointTable<T: Copy> {
    entries: ArrayVec<T, { SimConfig::POINT_TABLE_LEN }>,
}

impl<T: Copy> PointTable<T> {
    /// # Errors
    ///
    /// Returns `ConfigError::PointTableSize` unless `values` has exactly one
    /// entry per point count, zero included.
    pub fn new(values: &[T]) -> Result<Self, ConfigError> {
        if values.len() != SimConfig::POINT_TABLE_LEN {
            return Err(ConfigError::PointTableSize {
                expected: SimConfig::POINT_TABLE_LEN,
                actual: values.len(),
            });
        }
        Ok(Self {
            entries: values.iter().copied().collect(),
        })
    }

    pub fn get(&self, points: Points) -> T {
        self.entries[usize::from(points.get())]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

/// Number of ticks a periodic effect gets when applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickFormula {
    Fixed(u32),
    /// `points + offset`.
    PointsPlus(i32),
}

impl TickFormula {
    pub fn raw(self, points: Points) -> i64 {
        match self {
            Self::Fixed(ticks) => i64::from(ticks),
            Self::PointsPlus(offset) => i64::from(points.get()) + i64::from(offset),
        }
    }

    /// Checks that every point count yields at least one tick.
    pub fn validate(self) -> Result<(), ConfigError> {
        for points in Points::all() {
            let ticks = self.raw(points);
            if ticks < 1 || ticks > i64::from(u32::MAX) {
                return Err(ConfigError::InvalidTickCount {
                    points: points.get(),
                    ticks,
                });
            }
        }
        Ok(())
    }

    /// Tick count for a validated formula.
    pub fn ticks(self, points: Points) -> u32 {
        u32::try_from(self.raw(points).max(1)).unwrap_or(u32::MAX)
    }
}

/// Reads the caster's points without spending them.
pub fn observe(pools: &ResourcePools) -> Points {
    Points::saturating(pools.combo_points().current())
}

/// Spends every point, returning the count held before the reset.
pub fn consume(pools: &mut ResourcePools) -> Points {
    Points::saturating(pools.combo_points_mut().read_and_reset())
}
