use std::time::{Duration, Instant};

use super::card::Card;
use super::format::is_static_glyph;
use super::timers::TimerGroup;
use super::RollTiming;

/// Longest delay a timer can be scheduled with.
const MAX_DELAY: Duration = Duration::from_secs(86_400);

fn deadline(now: Instant, after: Duration) -> Instant {
    now.checked_add(after.min(MAX_DELAY)).unwrap_or(now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    StartRoll { card: usize, tile: usize, duration: Duration },
    Place { card: usize, tile: usize },
    Release,
}

/// What one animation frame did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Clack requests raised by tiles this frame, before coalescing.
    pub clacks: usize,
    /// Any tile glyph or phase changed.
    pub changed: bool,
    /// The busy guard dropped this frame.
    pub released: bool,
}

impl FrameReport {
    /// One sound per frame, however many tiles asked for it.
    pub fn should_clack(&self) -> bool {
        self.clacks > 0
    }
}

/// Drives the per-column roll of every animated tile and owns the busy guard.
#[derive(Debug)]
pub struct Animator {
    timing: RollTiming,
    timers: TimerGroup<TimerAction>,
    rolling: Vec<(usize, usize)>,
    busy: bool,
}

impl Animator {
    pub fn new(timing: RollTiming) -> Self {
        Self {
            timing,
            timers: TimerGroup::new(),
            rolling: Vec::new(),
            busy: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn rolling_tiles(&self) -> usize {
        self.rolling.len()
    }

    /// Cancel everything the previous cycle left behind and raise the guard.
    pub fn begin_cycle(&mut self) {
        self.timers.cancel_all();
        self.rolling.clear();
        self.busy = true;
    }

    /// Schedule the tile in `column` of card `card` to roll to `target`.
    pub fn schedule_tile(&mut self, now: Instant, card: usize, column: usize, target: char) {
        let tile = column;
        let delay = self.timing.column_delay(column);
        let action = if is_static_glyph(target) {
            TimerAction::Place { card, tile }
        } else {
            TimerAction::StartRoll {
                card,
                tile,
                duration: self.timing.roll.saturating_sub(delay),
            }
        };
        self.timers.schedule(deadline(now, delay), action);
    }

    /// Schedule the guard release once the widest column can have finished.
    pub fn finish_cycle(&mut self, now: Instant, max_tiles: usize) {
        self.timers.schedule(deadline(now, self.timing.release_after(max_tiles)), TimerAction::Release);
    }

    pub fn frame(&mut self, cards: &mut [Card], now: Instant) -> FrameReport {
        let mut report = FrameReport::default();

        for action in self.timers.take_due(now) {
            match action {
                TimerAction::StartRoll { card, tile, duration } => {
                    if let Some(cell) = cards.get_mut(card).and_then(|c| c.tiles.get_mut(tile)) {
                        cell.begin_roll(now, duration);
                        self.rolling.push((card, tile));
                    }
                }
                TimerAction::Place { card, tile } => {
                    if let Some(cell) = cards.get_mut(card).and_then(|c| c.tiles.get_mut(tile)) {
                        cell.place();
                        report.changed = true;
                    }
                }
                TimerAction::Release => {
                    self.busy = false;
                    report.released = true;
                }
            }
        }

        let step = self.timing.step;
        self.rolling.retain(|&(card, tile)| {
            let Some(cell) = cards.get_mut(card).and_then(|c| c.tiles.get_mut(tile)) else {
                return false;
            };
            if cell.frame(now, step) {
                report.clacks += 1;
            }
            report.changed = true;
            cell.is_rolling()
        });

        report
    }
}
