use std::time::{Duration, Instant};

pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

#[derive(Debug, Clone, PartialEq)]
pub enum TilePhase {
    /// Waiting for the column's start delay.
    Idle,
    Rolling {
        started_at: Instant,
        duration: Duration,
        last_step: Option<u64>,
    },
    Settled,
}

/// One character cell of a price.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// What the cell shows right now. A space renders blank.
    pub glyph: char,
    pub target: char,
    pub phase: TilePhase,
}

impl Tile {
    /// A tile showing its final glyph, no animation.
    pub fn settled(target: char) -> Self {
        Self {
            glyph: target,
            target,
            phase: TilePhase::Settled,
        }
    }

    /// A blank tile waiting to roll to `target`.
    pub fn pending(target: char) -> Self {
        Self {
            glyph: ' ',
            target,
            phase: TilePhase::Idle,
        }
    }

    /// Re-arm a displayed tile for a cosmetic flap; it keeps its glyph until it starts.
    pub fn rearm(&mut self) {
        self.phase = TilePhase::Idle;
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, TilePhase::Rolling { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, TilePhase::Settled)
    }

    /// Static glyphs skip rolling and appear at their start delay, silently.
    pub fn place(&mut self) {
        self.glyph = self.target;
        self.phase = TilePhase::Settled;
    }

    pub fn begin_roll(&mut self, now: Instant, duration: Duration) {
        self.phase = TilePhase::Rolling {
            started_at: now,
            duration,
            last_step: None,
        };
    }

    /// Recompute the glyph for this frame. Returns true when a clack is due:
    /// on every advanced digit step and once on settling.
    pub fn frame(&mut self, now: Instant, step: Duration) -> bool {
        let TilePhase::Rolling { started_at, duration, last_step } = &mut self.phase else {
            return false;
        };

        let elapsed = now.saturating_duration_since(*started_at);
        if elapsed >= *duration {
            self.glyph = self.target;
            self.phase = TilePhase::Settled;
            return true;
        }

        let step_ms = step.as_millis().max(1);
        let index = (elapsed.as_millis() / step_ms) as u64;
        self.glyph = DIGITS[(index % DIGITS.len() as u64) as usize];

        let advanced = *last_step != Some(index);
        *last_step = Some(index);
        advanced
    }
}
