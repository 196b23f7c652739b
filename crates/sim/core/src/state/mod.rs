//! Mutable encounter state owned by the engine.
//!
//! Units are stored in a `BTreeMap` so that iteration order, and therefore
//! every roll derived from it, is stable across runs.
mod common;
mod unit;

use std::collections::BTreeMap;

pub use common::{ActionId, Timestamp, UnitId};
pub use unit::{PendingCast, UnitState};

/// Everything that changes while an encounter runs, apart from periodic effects.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    pub now: Timestamp,
    pub units: BTreeMap<UnitId, UnitState>,
    /// Roll sequence number, advanced once per random draw.
    pub nonce: u64,
}

impl EncounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(&id)
    }

    /// Returns true if the unit exists and has not died or left.
    pub fn is_valid_target(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(|unit| unit.alive)
    }

    /// Returns the current roll nonce and advances it.
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce = self.nonce.wrapping_add(1);
        nonce
    }
}
