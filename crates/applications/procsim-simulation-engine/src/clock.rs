//! Simulation clock and pending-event queue
//!
//! Events carry an opaque resumption target. The queue pops them in time
//! order; events registered for the same instant pop in registration order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use procsim_core::SimTime;

/// Timed event wrapper for priority queue ordering
#[derive(Debug, Clone)]
struct TimedEvent<T> {
    time: SimTime,
    seq: u64,
    target: T,
}

// Priority queue orders by time (earliest first), then by registration
impl<T> Ord for TimedEvent<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse comparison for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for TimedEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Eq for TimedEvent<T> {}

impl<T> PartialEq for TimedEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

/// Current simulated time plus the set of pending events
#[derive(Debug)]
pub struct EventQueue<T> {
    now: SimTime,
    next_seq: u64,
    pending: BinaryHeap<TimedEvent<T>>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        EventQueue {
            now: 0.0,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Register `target` to resume `delay` time units from now
    pub fn schedule_after(&mut self, delay: SimTime, target: T) {
        debug_assert!(
            delay.is_finite() && delay >= 0.0,
            "event delay must be finite and non-negative, got {delay}"
        );

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(TimedEvent {
            time: self.now + delay,
            seq,
            target,
        });
    }

    /// Pop the earliest event and advance the clock to it
    pub fn pop(&mut self) -> Option<(SimTime, T)> {
        let event = self.pending.pop()?;
        debug_assert!(event.time >= self.now, "clock must never run backwards");
        self.now = event.time;
        Some((event.time, event.target))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
