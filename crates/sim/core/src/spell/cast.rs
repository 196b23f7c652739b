//! Cast state machine states and per-invocation context.

use std::sync::Arc;

use crate::combat::Outcome;
use crate::spell::{Points, SpellConfig};
use crate::state::{Timestamp, UnitId};
use crate::stats::ResourceKind;

/// Where one invocation of a spell currently is.
///
/// `Idle -> Casting (cast time > 0) -> Resolving -> Applied | Missed`.
/// `Applied` and `Missed` are terminal for the invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastState {
    Idle,
    /// Waiting for the scheduler to fire the completion event at `resume_at`.
    Casting { resume_at: Timestamp },
    Resolving,
    Applied,
    Missed,
}

impl CastState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Applied | Self::Missed)
    }
}

/// Scratch state of one invocation, discarded once the effect has been applied.
#[derive(Clone, Debug)]
pub struct CastContext {
    pub caster: UnitId,
    pub target: UnitId,
    pub spell: Arc<SpellConfig>,
    /// Combo points observed at cast start.
    pub points: Points,
    /// Resource deducted at cast start.
    pub paid: Option<(ResourceKind, f64)>,
    pub cast_time_ms: u64,
    pub outcome: Option<Outcome>,
    /// Nesting level of wrapper casts; zero for a cast requested by the caller.
    pub depth: u8,
}

impl CastContext {
    /// Context for a child spell cast by a wrapper effect.
    pub fn child(&self, spell: Arc<SpellConfig>, target: UnitId) -> Self {
        Self {
            caster: self.caster,
            target,
            spell,
            points: self.points,
            paid: None,
            cast_time_ms: 0,
            outcome: None,
            depth: self.depth + 1,
        }
    }
}
