use super::Board;
use crate::log_debug;

impl Board {
    /// Replay the roll on every displayed tile, landing on the glyph it already shows.
    ///
    /// Returns false without touching anything while a cycle is running or
    /// before the first successful render.
    pub fn idle_flap(&mut self) -> bool {
        if self.is_busy() || !self.has_rendered {
            log_debug!("idle flap skipped (busy: {}, rendered: {})", self.is_busy(), self.has_rendered);
            return false;
        }

        self.animator.begin_cycle();
        let now = self.clock.now();
        let mut max_tiles = 0;

        for (index, card) in self.cards.iter_mut().enumerate() {
            max_tiles = max_tiles.max(card.tiles.len());
            for (column, tile) in card.tiles.iter_mut().enumerate() {
                tile.rearm();
                self.animator.schedule_tile(now, index, column, tile.target);
            }
        }

        self.animator.finish_cycle(now, max_tiles);
        true
    }
}
