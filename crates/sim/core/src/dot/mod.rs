//! Periodic damage (damage-over-time) instances.
//!
//! One instance exists per (caster, spell, target). Its per-tick damage and
//! tick count are frozen when it is applied; later changes to stats or
//! multipliers never reach ticks already scheduled. Applying the same effect
//! again goes through the effect's [`RefreshPolicy`] and never stacks.
//!
//! Instances live in a generational slab. A [`DotHandle`] names a slot plus the
//! generation it was issued for, so cancelling or replacing an instance is O(1)
//! and any tick event still queued for the old generation resolves to nothing.

use std::collections::BTreeMap;

use crate::combat::{DefenseType, SpellSchool};
use crate::state::{ActionId, Timestamp, UnitId};

/// Mechanic tag of a periodic effect, visible to mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DotTag {
    Bleed,
    Poison,
    Disease,
    Curse,
}

/// What happens when an effect is applied to a target that already has it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefreshPolicy {
    /// New snapshot and new tick count; old remaining ticks are discarded.
    #[default]
    Replace,
    /// New tick count, old snapshot kept.
    Rollover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotKey {
    pub caster: UnitId,
    pub spell: ActionId,
    pub target: UnitId,
}

/// Generation-checked reference to a slab slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotHandle {
    slot: u32,
    generation: u32,
}

/// Values frozen at apply time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSnapshot {
    /// Damage per tick with every multiplier already applied.
    pub per_tick: f64,
    pub ticks: u32,
    pub interval_ms: u64,
    /// Zero for effects whose ticks cannot crit.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub school: SpellSchool,
    pub defense: DefenseType,
    pub tag: Option<DotTag>,
    pub threat_multiplier: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DotInstance {
    pub key: DotKey,
    pub snapshot: DotSnapshot,
    pub remaining_ticks: u32,
    pub next_tick_at: Timestamp,
    pub applied_at: Timestamp,
}

impl DotInstance {
    /// Damage still to come, before mitigation and crits.
    pub fn remaining_damage(&self) -> f64 {
        self.snapshot.per_tick * f64::from(self.remaining_ticks)
    }
}

/// How an application changed the manager.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Applied {
    Created,
    /// An existing instance was replaced; `discarded_ticks` never fire.
    Replaced { discarded_ticks: u32 },
    RolledOver { discarded_ticks: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotApplication {
    pub handle: DotHandle,
    pub first_tick_at: Timestamp,
    pub applied: Applied,
}

/// One tick handed back to the engine for mitigation and logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotTick {
    pub key: DotKey,
    pub snapshot: DotSnapshot,
    pub remaining_ticks: u32,
    /// When the next tick is due, or `None` if this was the last one.
    pub next_tick_at: Option<Timestamp>,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    instance: Option<DotInstance>,
}

/// Owns every active periodic instance of one encounter.
#[derive(Clone, Debug, Default)]
pub struct DotManager {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: BTreeMap<DotKey, DotHandle>,
}

impl DotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, handle: DotHandle) -> Option<&DotInstance> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.instance.as_ref()
    }

    pub fn handle_of(&self, key: &DotKey) -> Option<DotHandle> {
        self.index.get(key).copied()
    }

    pub fn find(&self, key: &DotKey) -> Option<&DotInstance> {
        self.handle_of(key).and_then(|handle| self.get(handle))
    }

    pub fn is_active(&self, key: &DotKey) -> bool {
        self.index.contains_key(key)
    }

    /// Active instances in key order.
    pub fn iter(&self) -> impl Iterator<Item = &DotInstance> {
        self.index.values().filter_map(|handle| self.get(*handle))
    }

    /// Creates the instance for `key`, or refreshes it under `policy`.
    ///
    /// The first tick is always due one interval after `now`.
    pub fn apply(
        &mut self,
        key: DotKey,
        snapshot: DotSnapshot,
        policy: RefreshPolicy,
        now: Timestamp,
    ) -> DotApplication {
        let first_tick_at = now + snapshot.interval_ms;

        if let Some(handle) = self.handle_of(&key) {
            let slot_index = handle.slot;
            let slot = &mut self.slots[slot_index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            let new_handle = DotHandle {
                slot: slot_index,
                generation: slot.generation,
            };

            let applied = match slot.instance.as_mut() {
                Some(instance) => {
                    let discarded_ticks = instance.remaining_ticks;
                    match policy {
                        RefreshPolicy::Replace => {
                            instance.snapshot = snapshot;
                            instance.applied_at = now;
                            Applied::Replaced { discarded_ticks }
                        }
                        RefreshPolicy::Rollover => {
                            instance.snapshot.ticks = snapshot.ticks;
                            instance.snapshot.interval_ms = snapshot.interval_ms;
                            Applied::RolledOver { discarded_ticks }
                        }
                    }
                }
                None => {
                    slot.instance = Some(Self::fresh(key, snapshot, now));
                    Applied::Created
                }
            };

            if let Some(instance) = slot.instance.as_mut() {
                instance.remaining_ticks = snapshot.ticks;
                instance.next_tick_at = first_tick_at;
            }
            self.index.insert(key, new_handle);

            return DotApplication {
                handle: new_handle,
                first_tick_at,
                applied,
            };
        }

        let instance = Self::fresh(key, snapshot, now);
        let handle = match self.free.pop() {
            Some(slot_index) => {
                let slot = &mut self.slots[slot_index as usize];
                slot.instance = Some(instance);
                DotHandle {
                    slot: slot_index,
                    generation: slot.generation,
                }
            }
            None => {
                let slot_index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    instance: Some(instance),
                });
                DotHandle {
                    slot: slot_index,
                    generation: 0,
                }
            }
        };
        self.index.insert(key, handle);

        DotApplication {
            handle,
            first_tick_at,
            applied: Applied::Created,
        }
    }

    fn fresh(key: DotKey, snapshot: DotSnapshot, now: Timestamp) -> DotInstance {
        DotInstance {
            key,
            snapshot,
            remaining_ticks: snapshot.ticks,
            next_tick_at: now + snapshot.interval_ms,
            applied_at: now,
        }
    }

    /// Consumes one tick of the instance behind `handle`.
    ///
    /// Returns `None` for stale handles (cancelled, expired or refreshed
    /// since the tick was scheduled). The instance is destroyed after its last
    /// tick.
    pub fn on_tick(&mut self, handle: DotHandle) -> Option<DotTick> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let instance = slot.instance.as_mut()?;

        instance.remaining_ticks = instance.remaining_ticks.saturating_sub(1);
        let key = instance.key;
        let snapshot = instance.snapshot;
        let remaining_ticks = instance.remaining_ticks;

        let next_tick_at = if remaining_ticks > 0 {
            instance.next_tick_at += snapshot.interval_ms;
            Some(instance.next_tick_at)
        } else {
            self.release(handle);
            None
        };

        Some(DotTick {
            key,
            snapshot,
            remaining_ticks,
            next_tick_at,
        })
    }

    /// Destroys the instance behind `handle`; its queued tick becomes stale.
    pub fn cancel(&mut self, handle: DotHandle) -> Option<DotInstance> {
        if self.get(handle).is_none() {
            return None;
        }
        self.release(handle)
    }

    /// Destroys every instance ticking on `target`.
    pub fn cancel_target(&mut self, target: UnitId) -> Vec<DotInstance> {
        let handles: Vec<DotHandle> = self
            .index
            .iter()
            .filter(|(key, _)| key.target == target)
            .map(|(_, handle)| *handle)
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| self.cancel(handle))
            .collect()
    }

    fn release(&mut self, handle: DotHandle) -> Option<DotInstance> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        let instance = slot.instance.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        self.index.remove(&instance.key);
        Some(instance)
    }
}
