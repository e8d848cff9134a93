//! The split-flap board: display state, busy guard and the animated card list.
mod animator;
mod card;
mod clock;
mod format;
mod idle_flap;
mod render;
mod tile;
mod timers;

pub use animator::{Animator, FrameReport};
pub use card::Card;
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_price, is_static_glyph, to_tiles, ChangeDirection, ChangeLabel, MAX_TILES, MIN_TILES};
pub use tile::{Tile, TilePhase, DIGITS};
pub use timers::TimerGroup;

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

use crate::feed::FeedItem;
use crate::log_warn;

pub const ERROR_PREFIX: &str = "ERRORE DATI: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollTiming {
    /// Total roll time of column 0.
    pub roll: Duration,
    /// Time each digit stays on a rolling tile.
    pub step: Duration,
    /// Extra start delay per column.
    pub stagger: Duration,
    /// Slack added before the busy guard drops.
    pub settle_margin: Duration,
}

impl Default for RollTiming {
    fn default() -> Self {
        Self {
            roll: Duration::from_millis(2000),
            step: Duration::from_millis(55),
            stagger: Duration::from_millis(40),
            settle_margin: Duration::from_millis(50),
        }
    }
}

impl RollTiming {
    pub fn column_delay(&self, column: usize) -> Duration {
        self.stagger.saturating_mul(u32::try_from(column).unwrap_or(u32::MAX))
    }

    pub fn release_after(&self, max_tiles: usize) -> Duration {
        self.roll
            .saturating_add(self.column_delay(max_tiles))
            .saturating_add(self.settle_margin)
    }
}

/// Session state for one board: everything a flap cycle reads or writes.
#[derive(Debug)]
pub struct Board {
    clock: Arc<dyn Clock>,
    animator: Animator,
    cards: Vec<Card>,
    /// Formatted price per feed index from the previous render.
    previous: Vec<String>,
    first_load: bool,
    has_rendered: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Local>>,
}

impl Board {
    pub fn new(timing: RollTiming, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            animator: Animator::new(timing),
            cards: Vec::new(),
            previous: Vec::new(),
            first_load: true,
            has_rendered: false,
            error: None,
            last_updated: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_busy(&self) -> bool {
        self.animator.is_busy()
    }

    pub fn is_first_load(&self) -> bool {
        self.first_load
    }

    pub fn has_rendered(&self) -> bool {
        self.has_rendered
    }

    pub fn previous_prices(&self) -> &[String] {
        &self.previous
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_error(&mut self, message: &str) {
        log_warn!("{}{}", ERROR_PREFIX, message);
        self.error = Some(format!("{}{}", ERROR_PREFIX, message));
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Apply the outcome of one poll: render on success, banner on failure.
    pub fn apply_poll_result(&mut self, outcome: Result<Vec<FeedItem>, String>) {
        match outcome {
            Ok(items) => {
                self.render(&items);
            }
            Err(message) => self.show_error(&message),
        }
    }

    /// Advance every rolling tile to the current clock time.
    pub fn advance_frame(&mut self) -> FrameReport {
        let now = self.clock.now();
        let report = self.animator.frame(&mut self.cards, now);
        if report.released {
            self.first_load = false;
        }
        report
    }
}
