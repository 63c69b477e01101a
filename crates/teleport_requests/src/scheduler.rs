//! Cooperative one-shot scheduling on the host tick.

use crate::request::Tick;
use std::collections::BTreeMap;

/// Deferred items keyed by the tick they become due.
///
/// The host calls [`TickScheduler::drain_due`] once per tick and processes
/// what comes back on the same thread as every other event. Items due on the
/// same tick come back in the order they were scheduled. Nothing can be
/// cancelled; consumers re-check their own state when an item comes due.
#[derive(Debug, Clone)]
pub struct TickScheduler<T> {
    queue: BTreeMap<(Tick, u64), T>,
    next_seq: u64,
}

impl<T> TickScheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `item` to come due `delay` ticks after `now`. Returns the due
    /// tick.
    pub fn schedule(&mut self, now: Tick, delay: Tick, item: T) -> Tick {
        let due = now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), item);
        due
    }

    /// Removes and returns every item due at or before `now`.
    pub fn drain_due(&mut self, now: Tick) -> Vec<T> {
        if now == Tick::MAX {
            return std::mem::take(&mut self.queue).into_values().collect();
        }
        let later = self.queue.split_off(&(now + 1, 0));
        std::mem::replace(&mut self.queue, later)
            .into_values()
            .collect()
    }

    /// Tick at which the next item comes due.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for TickScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_respects_time_and_order() {
        let mut scheduler = TickScheduler::new();
        assert_eq!(scheduler.schedule(0, 10, "b"), 10);
        assert_eq!(scheduler.schedule(5, 5, "c"), 10);
        assert_eq!(scheduler.schedule(0, 3, "a"), 3);
        scheduler.schedule(0, 20, "d");

        assert!(scheduler.drain_due(2).is_empty());
        assert_eq!(scheduler.next_due(), Some(3));
        assert_eq!(scheduler.drain_due(3), vec!["a"]);
        assert_eq!(scheduler.drain_due(15), vec!["b", "c"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.drain_due(Tick::MAX), vec!["d"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(7, 0, 1u8);
        assert_eq!(scheduler.drain_due(7), vec![1]);
    }

    #[test]
    fn test_schedule_saturates() {
        let mut scheduler = TickScheduler::new();
        assert_eq!(scheduler.schedule(Tick::MAX - 1, 10, ()), Tick::MAX);
        assert!(scheduler.drain_due(Tick::MAX - 1).is_empty());
        assert_eq!(scheduler.drain_due(Tick::MAX).len(), 1);

        scheduler.schedule(0, 1, ());
        scheduler.clear();
        assert!(scheduler.is_empty());
    }
}
