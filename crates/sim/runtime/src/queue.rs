//! Scheduler for the events the engine hands back.
//!
//! Events pop by due time, then [`EventPhase`], then insertion order, so two
//! events due at the same instant always fire in the same order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use sim_core::{EventPhase, ScheduledEvent, Timestamp};

#[derive(Clone, Debug)]
struct Queued {
    key: (Timestamp, EventPhase, u64),
    event: ScheduledEvent,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of scheduled events.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Queued>>,
    seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ScheduledEvent) {
        let (at, phase) = event.order_key();
        self.heap.push(Reverse(Queued {
            key: (at, phase, self.seq),
            event,
        }));
        self.seq += 1;
    }

    pub fn push_all<'a>(&mut self, events: impl IntoIterator<Item = &'a ScheduledEvent>) {
        for event in events {
            self.push(*event);
        }
    }

    /// Due time of the earliest event.
    pub fn peek_time(&self) -> Option<Timestamp> {
        self.heap.peek().map(|Reverse(queued)| queued.key.0)
    }

    /// Pops the earliest event if it is due at or before `until`.
    pub fn pop_due(&mut self, until: Timestamp) -> Option<ScheduledEvent> {
        if self.peek_time()? > until {
            return None;
        }
        self.heap.pop().map(|Reverse(queued)| queued.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{ResourceKind, SimEvent, UnitId};

    fn regen(at: u64, amount: f64) -> ScheduledEvent {
        ScheduledEvent::new(
            Timestamp(at),
            SimEvent::ResourceRegen {
                unit: UnitId(1),
                kind: ResourceKind::Energy,
                amount,
            },
        )
    }

    #[test]
    fn pops_in_time_then_phase_order() {
        let mut queue = EventQueue::new();
        queue.push(regen(2_000, 1.0));
        queue.push(ScheduledEvent::new(
            Timestamp(2_000),
            SimEvent::CastComplete { caster: UnitId(1) },
        ));
        queue.push(regen(1_000, 2.0));

        assert_eq!(queue.pop_due(Timestamp(5_000)), Some(regen(1_000, 2.0)));
        assert!(matches!(
            queue.pop_due(Timestamp(5_000)).map(|e| e.event),
            Some(SimEvent::CastComplete { .. })
        ));
        assert_eq!(queue.pop_due(Timestamp(5_000)), Some(regen(2_000, 1.0)));
        assert!(queue.is_empty());
    }

    #[test]
    fn same_key_keeps_insertion_order() {
        let mut queue = EventQueue::new();
        for amount in [3.0, 1.0, 2.0] {
            queue.push(regen(500, amount));
        }
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(Timestamp(500))).collect();
        assert_eq!(order, vec![regen(500, 3.0), regen(500, 1.0), regen(500, 2.0)]);
    }

    #[test]
    fn events_after_horizon_stay_queued() {
        let mut queue = EventQueue::new();
        queue.push(regen(3_000, 1.0));
        assert_eq!(queue.pop_due(Timestamp(2_999)), None);
        assert_eq!(queue.peek_time(), Some(Timestamp(3_000)));
        assert_eq!(queue.len(), 1);
    }
}
