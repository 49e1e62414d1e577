//! Discrete-event queue.
//!
//! Every delayed action in the model (response delivery, unblock, memory completion,
//! requester issue) is an [`Event`] scheduled at a future [`Tick`]. The queue pops
//! events in tick order; events scheduled for the same tick pop in the order they
//! were scheduled. Popping an event advances the logical clock to its tick.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::common::packet::Packet;

/// Logical simulation time.
pub type Tick = u64;

/// Something that happens at a scheduled tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The requester should issue its next request.
    CpuIssue,
    /// The controller unblocked after rejecting a request; the requester resubmits.
    CpuRetry,
    /// The controller delivers its queued response to the requester.
    CpuSend,
    /// The controller leaves its blocked state without a response.
    Unblock,
    /// Memory completes a fetch or writeback.
    MemResponse(Packet),
}

#[derive(Debug)]
struct Scheduled {
    when: Tick,
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.when == other.when && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and we want the earliest event on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .when
            .cmp(&self.when)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of scheduled events keyed by `(tick, insertion order)`.
#[derive(Debug, Default)]
pub struct EventQueue {
    now: Tick,
    seq: u64,
    heap: BinaryHeap<Scheduled>,
}

impl EventQueue {
    /// Creates an empty queue at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time: the tick of the most recently popped event.
    pub const fn now(&self) -> Tick {
        self.now
    }

    /// Schedules `event` at absolute tick `when`.
    ///
    /// A tick in the past is clamped to `now`; time never runs backwards.
    pub fn schedule(&mut self, when: Tick, event: Event) {
        let when = when.max(self.now);
        tracing::trace!(when, ?event, "schedule");
        self.heap.push(Scheduled {
            when,
            seq: self.seq,
            event,
        });
        self.seq += 1;
    }

    /// Schedules `event` `delay` ticks from now.
    pub fn schedule_in(&mut self, delay: Tick, event: Event) {
        self.schedule(self.now.saturating_add(delay), event);
    }

    /// Removes the earliest event and advances the clock to its tick.
    pub fn pop(&mut self) -> Option<(Tick, Event)> {
        let Scheduled { when, event, .. } = self.heap.pop()?;
        self.now = when;
        Some((when, event))
    }

    /// Tick of the earliest pending event.
    pub fn peek_tick(&self) -> Option<Tick> {
        self.heap.peek().map(|s| s.when)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
