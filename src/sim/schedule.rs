//! One-shot deferred events keyed to the frame clock
//!
//! Replaces fire-later timers: the owner schedules an event for a clock time
//! and polls once per tick. A due event is re-validated against the owner's
//! current state before it is handed back, so a stale event (its originating
//! jump, player or session has since been replaced) silently lapses.

/// A pending event
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<E> {
    pub fire_at_ms: f64,
    pub event: E,
}

/// Pending events, kept in firing order (ties keep insertion order)
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler<E> {
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: E) {
        self.schedule_at(now_ms + delay_ms, event);
    }

    pub fn schedule_at(&mut self, fire_at_ms: f64, event: E) {
        let idx = self.pending.partition_point(|s| s.fire_at_ms <= fire_at_ms);
        self.pending.insert(idx, Scheduled { fire_at_ms, event });
    }

    /// Remove every event due at `now_ms`. Events that fail `still_valid`
    /// are dropped; the rest are returned in firing order.
    pub fn drain_due(&mut self, now_ms: f64, mut still_valid: impl FnMut(&E) -> bool) -> Vec<E> {
        let due = self.pending.partition_point(|s| s.fire_at_ms <= now_ms);
        self.pending
            .drain(..due)
            .map(|s| s.event)
            .filter(|e| still_valid(e))
            .collect()
    }

    /// Drop pending events matching `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) {
        self.pending.retain(|s| !pred(&s.event));
    }

    pub fn contains(&self, mut pred: impl FnMut(&E) -> bool) -> bool {
        self.pending.iter().any(|s| pred(&s.event))
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time of the next pending event
    pub fn next_fire_time(&self) -> Option<f64> {
        self.pending.first().map(|s| s.fire_at_ms)
    }
}
