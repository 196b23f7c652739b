//! Outcome rolls and damage classification.
mod damage;
mod outcome;

pub use damage::{DefenseType, SpellSchool, crit_multiplier};
pub use outcome::{Outcome, OutcomeTable, RollCategory};
