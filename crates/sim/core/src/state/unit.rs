use crate::spell::{CastState, Points};
use crate::state::{ActionId, Timestamp, UnitId};
use crate::stats::{ResourceKind, ResourcePools};

/// Cast in progress, held by the caster until its completion event fires.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCast {
    pub spell: ActionId,
    pub target: UnitId,
    /// Combo points observed when the cast started.
    pub points: Points,
    /// Resource actually deducted at cast start, used for miss refunds.
    pub paid: Option<(ResourceKind, f64)>,
    pub started_at: Timestamp,
    pub resume_at: Timestamp,
}

/// Per-encounter mutable state of a single unit.
///
/// Stats live outside the core; a unit only carries what casting mutates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub pools: ResourcePools,
    /// Earliest time a spell that triggers the global cooldown may start.
    pub gcd_ready_at: Timestamp,
    pub casting: Option<PendingCast>,
    /// Cleared by `SideEffect::BreakStealth`. Rotations gate openers on it.
    pub stealthed: bool,
    pub alive: bool,
}

impl UnitState {
    pub fn new(id: UnitId, pools: ResourcePools) -> Self {
        Self {
            id,
            pools,
            gcd_ready_at: Timestamp::ZERO,
            casting: None,
            stealthed: false,
            alive: true,
        }
    }

    /// Creates a unit without resource pools, as used for training dummies.
    pub fn target(id: UnitId) -> Self {
        Self::new(id, ResourcePools::empty())
    }

    #[must_use]
    pub fn with_stealth(mut self) -> Self {
        self.stealthed = true;
        self
    }

    pub fn on_gcd(&self, now: Timestamp) -> bool {
        now < self.gcd_ready_at
    }

    pub fn cast_state(&self) -> CastState {
        match &self.casting {
            Some(pending) => CastState::Casting {
                resume_at: pending.resume_at,
            },
            None => CastState::Idle,
        }
    }
}
