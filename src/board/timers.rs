use std::time::Instant;

/// Timers scheduled by one flap cycle.
///
/// `cancel_all` drops every pending entry and bumps the generation, so an
/// entry scheduled before the cancel can never be returned by `take_due`.
#[derive(Debug)]
pub struct TimerGroup<T> {
    generation: u64,
    next_seq: u64,
    pending: Vec<Timer<T>>,
}

#[derive(Debug)]
struct Timer<T> {
    generation: u64,
    fire_at: Instant,
    seq: u64,
    action: T,
}

impl<T> TimerGroup<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, fire_at: Instant, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            generation: self.generation,
            fire_at,
            seq,
            action,
        });
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.generation += 1;
    }

    /// Remove and return every action due at `now`, earliest first.
    /// Actions with equal fire times keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let generation = self.generation;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|timer| timer.generation == generation)
            .partition(|timer| timer.fire_at <= now);
        self.pending = pending;

        due.sort_by_key(|timer| (timer.fire_at, timer.seq));
        due.into_iter().map(|timer| timer.action).collect()
    }
}

impl<T> Default for TimerGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_in_time_order() {
        let start = Instant::now();
        let mut timers = TimerGroup::new();
        timers.schedule(start + Duration::from_millis(80), "b");
        timers.schedule(start + Duration::from_millis(40), "a");
        timers.schedule(start + Duration::from_millis(500), "c");

        assert!(timers.take_due(start).is_empty());
        assert_eq!(timers.take_due(start + Duration::from_millis(100)), vec!["a", "b"]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel_all_drops_pending() {
        let start = Instant::now();
        let mut timers = TimerGroup::new();
        timers.schedule(start, 1);
        timers.schedule(start + Duration::from_millis(10), 2);

        timers.cancel_all();
        timers.schedule(start + Duration::from_millis(20), 3);

        assert_eq!(timers.generation(), 1);
        assert_eq!(timers.take_due(start + Duration::from_secs(1)), vec![3]);
        assert!(timers.is_empty());
    }
}
